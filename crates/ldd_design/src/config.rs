//! Toolchain configuration.
//!
//! Loaded from `ldd.yaml` in the project root when present. Every field is
//! optional in the file; relative paths resolve against the project root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DesignResult;
use crate::validator::UndeclaredDirectivePolicy;

/// Configuration of the design mapper and validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LddConfig {
    /// Directory holding one folder per group
    pub components_dir: PathBuf,
    /// Persisted design document
    pub design_file: PathBuf,
    /// Generated async component registration module
    pub async_loader_file: PathBuf,
    /// Output directory used by `build`
    pub output_dir: PathBuf,
    /// Per-component declaration file name
    pub declaration_file: String,
    /// Extension of component template files (without the dot)
    pub template_extension: String,
    /// Remove stray files found among the group folders
    pub repair_stray_entries: bool,
    /// How html directives without a declaration are treated
    pub undeclared_directives: UndeclaredDirectivePolicy,
    /// Command used to evaluate `properties.js`/`properties.ts` modules
    pub script_runner: String,
}

impl Default for LddConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("livingdocs"),
            design_file: PathBuf::from("livingdocs.config.json"),
            async_loader_file: PathBuf::from(".srl/plugins/asyncLdComponent.ts"),
            output_dir: PathBuf::from(".output"),
            declaration_file: "ld-conf.json".to_string(),
            template_extension: "html".to_string(),
            repair_stray_entries: true,
            undeclared_directives: UndeclaredDirectivePolicy::default(),
            script_runner: "node".to_string(),
        }
    }
}

impl LddConfig {
    /// Config file name looked up in the project root.
    pub const FILE_NAME: &'static str = "ldd.yaml";

    /// Load the configuration of a project, falling back to defaults.
    pub fn load(project_root: impl AsRef<Path>) -> DesignResult<Self> {
        let path = project_root.as_ref().join(Self::FILE_NAME);
        if !path.exists() {
            debug!("No {} found in {:?}, using defaults", Self::FILE_NAME, project_root.as_ref());
            return Ok(Self::default());
        }

        debug!("Reading config from {:?}", path);
        let content = fs::read_to_string(&path)?;
        let config: LddConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve every configured path against the project root.
    pub fn resolve(mut self, project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        for path in [
            &mut self.components_dir,
            &mut self.design_file,
            &mut self.async_loader_file,
            &mut self.output_dir,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }
}
