//! Error types for design mapping and validation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for design operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur while mapping, loading, or saving a design.
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Design source not found at path: {0}")]
    NotFound(PathBuf),

    #[error("Invalid component declaration in {path}: {message}")]
    InvalidDeclaration { path: PathBuf, message: String },

    #[error("Invalid property source {path}: {message}")]
    InvalidPropertySource { path: PathBuf, message: String },

    #[error("Script module evaluation failed for {path}: {message}")]
    ScriptEvaluation { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Design validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// A hard rule violation found by the design validator.
///
/// Every variant carries the offending identifiers so the message can be
/// acted on without re-deriving context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate component names [{}]", Names(.0))]
    DuplicateComponentNames(Vec<String>),

    #[error("duplicate group label [{}]", Names(.0))]
    DuplicateGroupLabels(Vec<String>),

    #[error("component properties [{}] are not declared", Names(.0))]
    UndeclaredProperties(Vec<String>),

    #[error("allowed parents [{}] do not exist in design", Names(.0))]
    UnknownAllowedParents(Vec<String>),

    #[error(
        "components [{}] are not in any group and will not show in the editor",
        Names(.0)
    )]
    ComponentsWithoutGroup(Vec<String>),

    #[error("duplicate directive values [{}] in component \"{component}\"", Names(.names))]
    DuplicateDirectiveValues { component: String, names: Vec<String> },

    #[error("directive doc-link used multiple times in component \"{component}\"")]
    MultipleLinkDirectives { component: String },

    #[error(
        "directive \"{directive}\" in component \"{component}\" references non-existing component/s [{}]",
        Names(.missing)
    )]
    UnknownDirectiveReferences {
        component: String,
        directive: String,
        missing: Vec<String>,
    },

    #[error(
        "directives [{}] in component \"{component}\" are declared but not referenced in html",
        Names(.names)
    )]
    UnreferencedDirectives { component: String, names: Vec<String> },

    #[error(
        "directives [{}] in component \"{component}\" are used in html but not declared",
        Names(.names)
    )]
    UndeclaredDirectives { component: String, names: Vec<String> },
}

impl ValidationError {
    /// Identifiers named by this violation.
    pub fn offenders(&self) -> &[String] {
        match self {
            Self::DuplicateComponentNames(names)
            | Self::DuplicateGroupLabels(names)
            | Self::UndeclaredProperties(names)
            | Self::UnknownAllowedParents(names)
            | Self::ComponentsWithoutGroup(names) => names,
            Self::DuplicateDirectiveValues { names, .. }
            | Self::UnreferencedDirectives { names, .. }
            | Self::UndeclaredDirectives { names, .. } => names,
            Self::UnknownDirectiveReferences { missing, .. } => missing,
            Self::MultipleLinkDirectives { .. } => &[],
        }
    }
}

/// Comma-joined list rendering used inside error messages.
struct Names<'a>(&'a [String]);

impl fmt::Display for Names<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_offenders() {
        let err = ValidationError::UndeclaredProperties(vec!["width".into(), "alignment".into()]);
        assert_eq!(
            err.to_string(),
            "component properties [width,alignment] are not declared"
        );
        assert_eq!(err.offenders().len(), 2);
    }

    #[test]
    fn test_validation_error_converts_into_design_error() {
        let err: DesignError = ValidationError::MultipleLinkDirectives {
            component: "teaser".into(),
        }
        .into();
        assert!(err.to_string().contains("teaser"));
    }
}
