//! Property schema discovery and loading.
//!
//! Property schemas live in `properties.json`, `properties.js` or
//! `properties.ts` files anywhere below the components directory. JSON files
//! are parsed directly; script modules are handed to a [`ScriptEvaluator`]
//! which returns the JSON of their default export.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{DesignError, DesignResult};

/// File name patterns of property schema files.
pub const PROPERTY_FILE_PATTERNS: [&str; 3] = ["properties.json", "properties.js", "properties.ts"];

/// Candidate property files; the extension is classified by [`PropertySource::from_path`].
static PROPERTY_FILE_GLOB: LazyLock<glob::Pattern> =
    LazyLock::new(|| glob::Pattern::new("properties.*").unwrap());

/// Where a property schema comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    StaticJson(PathBuf),
    ScriptModule(PathBuf),
}

impl PropertySource {
    /// Classify a property file by its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::StaticJson(path)),
            Some("js") | Some("ts") => Some(Self::ScriptModule(path)),
            _ => None,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::StaticJson(path) | Self::ScriptModule(path) => path,
        }
    }
}

/// Evaluates a script module and returns its default export as JSON.
#[cfg_attr(test, mockall::automock)]
pub trait ScriptEvaluator {
    fn evaluate_default_export(&self, path: &Path) -> DesignResult<Value>;
}

/// Evaluates modules by running them through a JavaScript runtime.
#[derive(Debug, Clone)]
pub struct NodeEvaluator {
    program: String,
}

impl NodeEvaluator {
    const LOADER: &'static str = "import { pathToFileURL } from 'node:url';\
        const m = await import(pathToFileURL(process.argv[1]).href);\
        process.stdout.write(JSON.stringify(m.default ?? {}));";

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NodeEvaluator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl ScriptEvaluator for NodeEvaluator {
    fn evaluate_default_export(&self, path: &Path) -> DesignResult<Value> {
        debug!("Evaluating script module {:?} with {}", path, self.program);

        let output = Command::new(&self.program)
            .arg("--input-type=module")
            .arg("-e")
            .arg(Self::LOADER)
            .arg(path)
            .output()
            .map_err(|e| DesignError::ScriptEvaluation {
                path: path.to_path_buf(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(DesignError::ScriptEvaluation {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| DesignError::ScriptEvaluation {
            path: path.to_path_buf(),
            message: format!("default export is not JSON: {}", e),
        })
    }
}

/// Property files found below a root plus the paths that could not be searched.
#[derive(Debug, Default)]
pub struct PropertyDiscovery {
    pub sources: Vec<PropertySource>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Merged property schemas plus the files that could not be loaded.
#[derive(Debug, Default)]
pub struct PropertyMerge {
    pub properties: BTreeMap<String, Value>,
    pub failures: Vec<(PathBuf, String)>,
}

/// Finds, loads and merges property schema files.
pub struct PropertyLoader {
    evaluator: Box<dyn ScriptEvaluator>,
}

impl PropertyLoader {
    pub fn new(evaluator: Box<dyn ScriptEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Find every property file below `root`, in path order.
    ///
    /// Entries that could not be read are returned alongside the sources.
    pub fn discover(root: &Path) -> PropertyDiscovery {
        let mut discovery = PropertyDiscovery::default();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    warn!("Cannot search {:?} for property files: {}", path, e);
                    discovery.errors.push((path, e.to_string()));
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if !entry.file_type().is_file() || !PROPERTY_FILE_GLOB.matches(&name) {
                continue;
            }
            if let Some(source) = PropertySource::from_path(entry.into_path()) {
                discovery.sources.push(source);
            }
        }

        discovery
    }

    /// Load one property source into its top-level mapping.
    pub fn load(&self, source: &PropertySource) -> DesignResult<serde_json::Map<String, Value>> {
        let value = match source {
            PropertySource::StaticJson(path) => {
                debug!("Reading properties from {:?}", path);
                let content = fs::read_to_string(path)?;
                serde_json::from_str(&content)?
            }
            PropertySource::ScriptModule(path) => self.evaluator.evaluate_default_export(path)?,
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(DesignError::InvalidPropertySource {
                path: source.path().to_path_buf(),
                message: format!("expected an object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Shallow-merge every property file below `root`.
    ///
    /// Files are applied in path order and later files win on key collision.
    pub fn merge_all(&self, root: &Path) -> PropertyMerge {
        let discovery = Self::discover(root);
        let mut merge = PropertyMerge {
            failures: discovery.errors,
            ..Default::default()
        };
        let mut origin: BTreeMap<String, PathBuf> = BTreeMap::new();

        for source in discovery.sources {
            let map = match self.load(&source) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Skipping property file {:?}: {}", source.path(), e);
                    merge
                        .failures
                        .push((source.path().to_path_buf(), e.to_string()));
                    continue;
                }
            };

            for (key, value) in map {
                if let Some(previous) = origin.insert(key.clone(), source.path().to_path_buf()) {
                    warn!(
                        "Property \"{}\" from {:?} overrides the declaration in {:?}",
                        key,
                        source.path(),
                        previous
                    );
                }
                merge.properties.insert(key, value);
            }
        }

        merge
    }
}

impl Default for PropertyLoader {
    fn default() -> Self {
        Self::new(Box::new(NodeEvaluator::default()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_source_from_path() {
        assert!(matches!(
            PropertySource::from_path("a/properties.json"),
            Some(PropertySource::StaticJson(_))
        ));
        assert!(matches!(
            PropertySource::from_path("a/properties.ts"),
            Some(PropertySource::ScriptModule(_))
        ));
        assert!(PropertySource::from_path("a/properties.yaml").is_none());
    }

    #[test]
    fn test_discover_is_recursive_and_sorted() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(&root.join("b.Text/paragraph/properties.json"), "{}");
        write(&root.join("a.Properties/properties.json"), "{}");
        write(&root.join("a.Properties/alignment/properties.js"), "export default {}");
        write(&root.join("a.Properties/alignment/other.json"), "{}");

        write(&root.join("a.Properties/alignment/properties.yaml"), "{}");

        let discovery = PropertyLoader::discover(root);
        assert!(discovery.errors.is_empty());
        let found: Vec<PathBuf> = discovery
            .sources
            .iter()
            .map(|s| s.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("a.Properties/alignment/properties.js"),
                PathBuf::from("a.Properties/properties.json"),
                PathBuf::from("b.Text/paragraph/properties.json"),
            ]
        );
    }

    #[test]
    fn test_unsearchable_root_is_recorded_as_failure() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing");

        let mut evaluator = MockScriptEvaluator::new();
        evaluator.expect_evaluate_default_export().never();

        let merge = PropertyLoader::new(Box::new(evaluator)).merge_all(&missing);
        assert!(merge.properties.is_empty());
        assert_eq!(merge.failures.len(), 1);
        assert_eq!(merge.failures[0].0, missing);
    }

    #[test]
    fn test_merge_last_write_wins_and_uses_evaluator() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let script = root.join("a/properties.ts");
        write(&script, "export default { width: {} }");
        write(
            &root.join("b/properties.json"),
            r#"{"alignment": {"type": "style"}, "width": {"from": "json"}}"#,
        );

        let mut evaluator = MockScriptEvaluator::new();
        evaluator
            .expect_evaluate_default_export()
            .with(eq(script.clone()))
            .times(1)
            .returning(|_| Ok(json!({"width": {"from": "script"}, "spacer": {}})));

        let merge = PropertyLoader::new(Box::new(evaluator)).merge_all(root);

        assert!(merge.failures.is_empty());
        assert_eq!(merge.properties.len(), 3);
        assert_eq!(merge.properties["width"], json!({"from": "json"}));
        assert_eq!(merge.properties["alignment"], json!({"type": "style"}));
    }

    #[test]
    fn test_non_object_file_is_recorded_as_failure() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(&root.join("x/properties.json"), "[1, 2]");
        write(&root.join("y/properties.json"), r#"{"width": {}}"#);

        let mut evaluator = MockScriptEvaluator::new();
        evaluator.expect_evaluate_default_export().never();

        let merge = PropertyLoader::new(Box::new(evaluator)).merge_all(root);
        assert_eq!(merge.failures.len(), 1);
        assert!(merge.failures[0].1.contains("expected an object"));
        assert!(merge.properties.contains_key("width"));
    }

    #[test]
    fn test_evaluator_error_is_recorded() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(&root.join("properties.js"), "throw new Error()");

        let mut evaluator = MockScriptEvaluator::new();
        evaluator.expect_evaluate_default_export().returning(|path| {
            Err(DesignError::ScriptEvaluation {
                path: path.to_path_buf(),
                message: "boom".into(),
            })
        });

        let merge = PropertyLoader::new(Box::new(evaluator)).merge_all(root);
        assert!(merge.properties.is_empty());
        assert!(merge.failures[0].1.contains("boom"));
    }
}
