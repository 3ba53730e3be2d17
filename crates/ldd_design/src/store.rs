//! Design document persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DesignError, DesignResult};
use crate::models::DesignDocument;

/// Reads and writes the design document as pretty-printed JSON.
pub struct DesignStore {
    path: PathBuf,
}

impl DesignStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted design, or an empty one when the file is missing.
    pub fn load(&self) -> DesignResult<DesignDocument> {
        if !self.path.exists() {
            info!("No design document at {:?}, starting from an empty one", self.path);
            return Ok(DesignDocument::new());
        }

        debug!("Reading design from {:?}", self.path);
        let content = fs::read_to_string(&self.path)?;
        let design: DesignDocument = serde_json::from_str(&content)?;
        Ok(design)
    }

    /// Persist the design.
    pub fn save(&self, design: &DesignDocument) -> DesignResult<()> {
        Self::write_to(&self.path, design)
    }

    /// Write a copy of the design to another location, e.g. a build output.
    pub fn export(design: &DesignDocument, path: &Path) -> DesignResult<()> {
        Self::write_to(path, design)
    }

    fn write_to(path: &Path, design: &DesignDocument) -> DesignResult<()> {
        debug!("Writing design to {:?}", path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(design)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }
}

/// Name and version of the project, read from its `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}

impl PackageInfo {
    pub fn read(project_root: &Path) -> DesignResult<Self> {
        let path = project_root.join("package.json");
        if !path.exists() {
            return Err(DesignError::NotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        let info: PackageInfo = serde_json::from_str(&content)?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentDeclaration, Group};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty_design() {
        let temp = tempdir().unwrap();
        let store = DesignStore::new(temp.path().join("livingdocs.config.json"));
        assert_eq!(store.load().unwrap(), DesignDocument::new());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let store = DesignStore::new(temp.path().join("livingdocs.config.json"));

        let mut design = DesignDocument::new();
        design.stamp("design", "1.0.0");
        design.groups.push(Group::new("Text", vec!["lead".into()]));
        design.components.push(ComponentDeclaration::new("lead", "<p></p>"));

        store.save(&design).unwrap();
        let written = fs::read_to_string(store.path()).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("  \"groups\": ["));
        assert_eq!(store.load().unwrap(), design);
    }

    #[test]
    fn test_export_creates_directories() {
        let temp = tempdir().unwrap();
        let target = temp.path().join(".output/ldd/design.json");
        DesignStore::export(&DesignDocument::new(), &target).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn test_package_info() {
        let temp = tempdir().unwrap();
        assert!(matches!(PackageInfo::read(temp.path()), Err(DesignError::NotFound(_))));

        fs::write(
            temp.path().join("package.json"),
            r#"{"name": "@acme/annual-report", "version": "3.1.0", "private": true}"#,
        )
        .unwrap();
        let info = PackageInfo::read(temp.path()).unwrap();
        assert_eq!(info.name, "@acme/annual-report");
        assert_eq!(info.version, "3.1.0");
    }
}
