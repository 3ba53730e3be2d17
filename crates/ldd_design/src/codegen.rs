//! Async component loader generation.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::DesignResult;
use crate::models::AsyncComponent;

/// Render the module that registers every UI component asynchronously.
pub fn render_async_loader(components: &[AsyncComponent]) -> String {
    let mut lines = vec![
        "import { defineAsyncComponent } from 'vue'".to_string(),
        "export default function asyncLdComponent(app) {".to_string(),
    ];

    lines.extend(components.iter().map(|c| {
        format!(
            " app.component('{}', defineAsyncComponent(() => import('{}')))",
            c.name, c.path
        )
    }));

    lines.push("}".to_string());
    lines.join("\n")
}

/// Write the loader module, returning whether the file changed.
pub fn write_async_loader(path: &Path, components: &[AsyncComponent]) -> DesignResult<bool> {
    let content = render_async_loader(components);

    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        debug!("Async loader {:?} is up to date", path);
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    info!("Wrote {} async components to {:?}", components.len(), path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn title() -> AsyncComponent {
        AsyncComponent {
            name: "SrlLdTitleH1".into(),
            path: "#ld/Titles/title-h1/title-h1.vue".into(),
        }
    }

    #[test]
    fn test_render_async_loader() {
        assert_eq!(
            render_async_loader(&[title()]),
            "import { defineAsyncComponent } from 'vue'\n\
             export default function asyncLdComponent(app) {\n \
             app.component('SrlLdTitleH1', defineAsyncComponent(() => import('#ld/Titles/title-h1/title-h1.vue')))\n\
             }"
        );
    }

    #[test]
    fn test_render_without_components() {
        assert_eq!(
            render_async_loader(&[]),
            "import { defineAsyncComponent } from 'vue'\nexport default function asyncLdComponent(app) {\n}"
        );
    }

    #[test]
    fn test_write_only_when_changed() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".srl/plugins/asyncLdComponent.ts");

        assert!(write_async_loader(&path, &[title()]).unwrap());
        assert!(!write_async_loader(&path, &[title()]).unwrap());
        assert!(write_async_loader(&path, &[]).unwrap());
    }
}
