//! Component source tree scanning.
//!
//! The components directory holds one folder per group; every group folder
//! holds one folder per component. A component folder qualifies when it has
//! a template and a declaration file. Folders are visited in file name order
//! so repeated scans of an unchanged tree produce identical results.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::error::{DesignError, DesignResult};
use crate::markup::minify_html;
use crate::models::{AsyncComponent, ComponentDeclaration};
use crate::properties::PROPERTY_FILE_PATTERNS;

/// Options controlling how the tree is scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub declaration_file: String,
    pub template_extension: String,
    /// Remove stray files found among the group folders.
    pub repair_stray_entries: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            declaration_file: "ld-conf.json".to_string(),
            template_extension: "html".to_string(),
            repair_stray_entries: true,
        }
    }
}

/// A qualifying component folder.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedComponent {
    pub folder: String,
    pub declaration: ComponentDeclaration,
    pub async_component: Option<AsyncComponent>,
}

/// A group folder and its qualifying components, in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedGroup {
    pub folder: String,
    pub label: String,
    pub components: Vec<ScannedComponent>,
}

impl ScannedGroup {
    pub fn component_names(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|c| c.declaration.name.clone())
            .collect()
    }
}

/// A part of the tree that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    /// Group label or file path the failure belongs to
    pub scope: String,
    pub message: String,
}

/// Result of scanning the whole tree.
#[derive(Debug, Default)]
pub struct TreeScan {
    pub groups: Vec<ScannedGroup>,
    pub failures: Vec<ScanFailure>,
    /// Stray files removed from the tree
    pub repaired: Vec<PathBuf>,
}

/// Scanner over a components directory.
pub struct ComponentScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl ComponentScanner {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan every group folder below the root.
    ///
    /// Errors inside one group are recorded as failures; only an unreadable
    /// root is returned as an error.
    pub fn scan(&self) -> DesignResult<TreeScan> {
        if !self.root.is_dir() {
            return Err(DesignError::NotFound(self.root.clone()));
        }

        let mut scan = TreeScan::default();

        for entry in sorted_children(&self.root)? {
            let path = entry.path();
            let folder = entry.file_name().to_string_lossy().to_string();

            if !path.is_dir() {
                self.handle_stray_entry(path, &folder, &mut scan);
                continue;
            }

            let label = group_label(&folder);
            match self.scan_group(path, &folder) {
                Ok(group) if group.components.is_empty() => {
                    debug!("Group {:?} has no components, skipping", folder);
                }
                Ok(group) => scan.groups.push(group),
                Err(e) => {
                    error!("Failed to scan group {:?}: {}", folder, e);
                    scan.failures.push(ScanFailure {
                        scope: label,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(scan)
    }

    /// A file that failed to be removed is recorded as a failure of its own.
    fn handle_stray_entry(&self, path: &Path, name: &str, scan: &mut TreeScan) {
        if PROPERTY_FILE_PATTERNS.contains(&name) {
            return;
        }

        if !self.options.repair_stray_entries {
            warn!("Ignoring stray file {:?} in the components directory", path);
            return;
        }

        warn!("Removing stray file {:?} from the components directory", path);
        match fs::remove_file(path) {
            Ok(()) => scan.repaired.push(path.to_path_buf()),
            Err(e) => {
                error!("Failed to remove stray file {:?}: {}", path, e);
                scan.failures.push(ScanFailure {
                    scope: path.display().to_string(),
                    message: format!("failed to remove stray file: {}", e),
                });
            }
        }
    }

    /// Scan one group folder.
    pub fn scan_group(&self, path: &Path, folder: &str) -> DesignResult<ScannedGroup> {
        let mut components = Vec::new();

        for entry in sorted_children(path)? {
            if !entry.path().is_dir() {
                continue;
            }
            let component_folder = entry.file_name().to_string_lossy().to_string();
            if let Some(component) = self.scan_component(entry.path(), folder, &component_folder)? {
                components.push(component);
            }
        }

        Ok(ScannedGroup {
            folder: folder.to_string(),
            label: group_label(folder),
            components,
        })
    }

    /// Scan one component folder, returning `None` when it does not qualify.
    pub fn scan_component(
        &self,
        path: &Path,
        group_folder: &str,
        folder: &str,
    ) -> DesignResult<Option<ScannedComponent>> {
        let declaration_path = path.join(&self.options.declaration_file);
        if !declaration_path.is_file() {
            debug!("Skipping {:?}: no {}", path, self.options.declaration_file);
            return Ok(None);
        }

        let Some(template_path) = self.find_template(path, folder)? else {
            debug!("Skipping {:?}: no single .{} template", path, self.options.template_extension);
            return Ok(None);
        };

        let html = fs::read_to_string(&template_path)?;
        let declaration = read_declaration(&declaration_path, folder, minify_html(&html))?;

        let vue_path = path.join(format!("{}.vue", folder));
        let async_component = vue_path.is_file().then(|| AsyncComponent {
            name: format!("SrlLd{}", upper_camel_case(&strip_order_prefix(folder))),
            path: format!("#ld/{}/{}/{}.vue", group_folder, folder, folder),
        });

        Ok(Some(ScannedComponent {
            folder: folder.to_string(),
            declaration,
            async_component,
        }))
    }

    /// `<folder>.<ext>` when present, otherwise the only file with the
    /// template extension.
    fn find_template(&self, path: &Path, folder: &str) -> DesignResult<Option<PathBuf>> {
        let ext = self.options.template_extension.as_str();
        let preferred = path.join(format!("{}.{}", folder, ext));
        if preferred.is_file() {
            return Ok(Some(preferred));
        }

        let mut candidates: Vec<PathBuf> = sorted_children(path)?
            .into_iter()
            .filter(|e| e.path().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|e| e == ext))
            .collect();

        if candidates.len() == 1 {
            Ok(candidates.pop())
        } else {
            Ok(None)
        }
    }
}

/// Parse a declaration file and attach the minified template.
fn read_declaration(path: &Path, folder: &str, html: String) -> DesignResult<ComponentDeclaration> {
    let content = fs::read_to_string(path)?;
    let mut value: Value = serde_json::from_str(&content)?;

    let Some(object) = value.as_object_mut() else {
        return Err(DesignError::InvalidDeclaration {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        });
    };

    if !object.get("name").is_some_and(Value::is_string) {
        object.insert("name".to_string(), Value::String(strip_order_prefix(folder)));
    }
    object.remove("html");

    let mut declaration: ComponentDeclaration =
        serde_json::from_value(value).map_err(|e| DesignError::InvalidDeclaration {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    declaration.html = html;
    Ok(declaration)
}

fn sorted_children(path: &Path) -> DesignResult<Vec<walkdir::DirEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => DesignError::Io(io),
            None => DesignError::NotFound(path.to_path_buf()),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Strip an ordering prefix: everything up to and including the first `.`.
pub fn strip_order_prefix(name: &str) -> String {
    match name.split_once('.') {
        Some((_, rest)) => rest.to_string(),
        None => name.to_string(),
    }
}

/// Display label of a group folder.
pub fn group_label(folder: &str) -> String {
    strip_order_prefix(folder)
        .replace("_and_", " / ")
        .replace('_', " ")
}

/// `title-h1` -> `TitleH1`
pub fn upper_camel_case(input: &str) -> String {
    input
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Log a one-line summary of a scan.
pub(crate) fn log_summary(scan: &TreeScan) {
    let components: usize = scan.groups.iter().map(|g| g.components.len()).sum();
    info!(
        "Scanned {} groups with {} components ({} failed)",
        scan.groups.len(),
        components,
        scan.failures.len()
    );
}
