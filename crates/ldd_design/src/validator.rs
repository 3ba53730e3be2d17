//! Design document validation.
//!
//! The validator runs a fixed battery of referential-integrity checks over a
//! finished [`DesignDocument`]. Unused property schemas are only reported as
//! warnings; every other rule is a hard failure and the first violation stops
//! the run.

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::directive::{scan_directives, DirectiveKind};
use crate::error::ValidationError;
use crate::models::{ComponentDeclaration, DesignDocument, ROOT_PARENT};

/// Treatment of html directives that have no entry in a component's
/// `directives` map.
///
/// Components without any `directives` map are never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndeclaredDirectivePolicy {
    Allow,
    #[default]
    Warn,
    Deny,
}

impl FromStr for UndeclaredDirectivePolicy {
    type Err = String;

    /// Parses the same names `ldd.yaml` accepts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.to_string()))
            .map_err(|_| format!("unknown undeclared directive policy: {} (expected allow, warn or deny)", s))
    }
}

/// Outcome of a passing validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validator over a borrowed design document.
pub struct DesignValidator<'a> {
    design: &'a DesignDocument,
    undeclared_directives: UndeclaredDirectivePolicy,
}

impl<'a> DesignValidator<'a> {
    pub fn new(design: &'a DesignDocument) -> Self {
        Self {
            design,
            undeclared_directives: UndeclaredDirectivePolicy::default(),
        }
    }

    pub fn with_undeclared_directives(mut self, policy: UndeclaredDirectivePolicy) -> Self {
        self.undeclared_directives = policy;
        self
    }

    /// Run every check in order.
    pub fn validate(&self) -> Result<ValidationReport, ValidationError> {
        let mut report = ValidationReport::default();
        report.warnings.extend(self.all_component_properties_are_used());

        self.has_no_duplicate_component_names()?;
        self.has_no_duplicate_group_labels()?;
        self.used_properties_are_declared()?;
        self.every_allowed_parent_exists_in_design()?;
        self.every_component_has_a_group()?;
        report
            .warnings
            .extend(self.every_declared_directive_exists_on_component()?);

        debug!(
            "Design with {} components passed validation ({} warnings)",
            self.design.components.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    /// Whether the design passes every hard check.
    pub fn is_valid(&self) -> Result<bool, ValidationError> {
        self.validate().map(|_| true)
    }

    /// Advisory: property schemas no component opts into.
    pub fn all_component_properties_are_used(&self) -> Vec<String> {
        let unused: Vec<String> = self
            .design
            .component_properties
            .keys()
            .filter(|prop| !self.design.components.iter().any(|c| c.uses_property(prop)))
            .cloned()
            .collect();

        if unused.is_empty() {
            return Vec::new();
        }

        let message = format!(
            "component properties [{}] are unused and can be removed",
            unused.join(",")
        );
        warn!("{}", message);
        vec![message]
    }

    pub fn has_no_duplicate_component_names(&self) -> Result<(), ValidationError> {
        let duplicates = duplicates(self.design.components.iter().map(|c| c.name.as_str()));
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::DuplicateComponentNames(duplicates))
        }
    }

    pub fn has_no_duplicate_group_labels(&self) -> Result<(), ValidationError> {
        let duplicates = duplicates(self.design.groups.iter().map(|g| g.label.as_str()));
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::DuplicateGroupLabels(duplicates))
        }
    }

    pub fn used_properties_are_declared(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        let undeclared: Vec<String> = self
            .design
            .components
            .iter()
            .flat_map(|c| c.property_names())
            .filter(|p| seen.insert(p.as_str()))
            .filter(|p| !self.design.component_properties.contains_key(p.as_str()))
            .cloned()
            .collect();

        if undeclared.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::UndeclaredProperties(undeclared))
        }
    }

    pub fn every_allowed_parent_exists_in_design(&self) -> Result<(), ValidationError> {
        let missing: Vec<String> = self
            .design
            .components
            .iter()
            .filter_map(|c| c.allowed_parents.as_ref())
            .flatten()
            .filter(|parent| parent.as_str() != ROOT_PARENT)
            .filter(|parent| !self.design.has_component(parent))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::UnknownAllowedParents(missing))
        }
    }

    pub fn every_component_has_a_group(&self) -> Result<(), ValidationError> {
        let orphans: Vec<String> = self
            .design
            .components
            .iter()
            .filter(|c| !self.design.groups.iter().any(|g| g.contains(&c.name)))
            .map(|c| c.name.clone())
            .collect();

        if orphans.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ComponentsWithoutGroup(orphans))
        }
    }

    /// Check directive usage of every component, returning warnings for
    /// undeclared html directives.
    pub fn every_declared_directive_exists_on_component(&self) -> Result<Vec<String>, ValidationError> {
        let mut warnings = Vec::new();
        for component in &self.design.components {
            warnings.extend(self.declared_directives_exist_on_component(component)?);
        }
        Ok(warnings)
    }

    /// Cross-check a component's markup against its `directives` map.
    pub fn declared_directives_exist_on_component(
        &self,
        component: &ComponentDeclaration,
    ) -> Result<Vec<String>, ValidationError> {
        let occurrences = scan_directives(&component.html);

        let duplicates = duplicates(occurrences.iter().map(|o| o.value));
        if !duplicates.is_empty() {
            return Err(ValidationError::DuplicateDirectiveValues {
                component: component.name.clone(),
                names: duplicates,
            });
        }

        let links = occurrences
            .iter()
            .filter(|o| o.kind == DirectiveKind::Link)
            .count();
        if links > 1 {
            return Err(ValidationError::MultipleLinkDirectives {
                component: component.name.clone(),
            });
        }

        let Some(directives) = &component.directives else {
            return Ok(Vec::new());
        };

        for (directive_name, directive) in directives {
            if !directive.references_components() {
                continue;
            }
            let missing: Vec<String> = directive
                .referenced_components()
                .filter(|name| !self.design.has_component(name))
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if !missing.is_empty() {
                return Err(ValidationError::UnknownDirectiveReferences {
                    component: component.name.clone(),
                    directive: directive_name.clone(),
                    missing,
                });
            }
        }

        let found: HashSet<&str> = occurrences.iter().map(|o| o.value).collect();
        let unreferenced: Vec<String> = directives
            .keys()
            .filter(|name| !found.contains(name.as_str()))
            .cloned()
            .collect();
        if !unreferenced.is_empty() {
            return Err(ValidationError::UnreferencedDirectives {
                component: component.name.clone(),
                names: unreferenced,
            });
        }

        self.check_undeclared_directives(component, occurrences.iter().map(|o| o.value))
    }

    fn check_undeclared_directives<'h>(
        &self,
        component: &ComponentDeclaration,
        found: impl Iterator<Item = &'h str>,
    ) -> Result<Vec<String>, ValidationError> {
        if self.undeclared_directives == UndeclaredDirectivePolicy::Allow {
            return Ok(Vec::new());
        }

        let declared = component.directives.as_ref();
        let undeclared: Vec<String> = found
            .filter(|value| !declared.is_some_and(|d| d.contains_key(*value)))
            .map(str::to_string)
            .collect();

        if undeclared.is_empty() {
            return Ok(Vec::new());
        }

        match self.undeclared_directives {
            UndeclaredDirectivePolicy::Deny => Err(ValidationError::UndeclaredDirectives {
                component: component.name.clone(),
                names: undeclared,
            }),
            _ => {
                let message = format!(
                    "directives [{}] in component \"{}\" are used in html but not declared",
                    undeclared.join(","),
                    component.name
                );
                warn!("{}", message);
                Ok(vec![message])
            }
        }
    }
}

/// Values seen more than once, each listed once in order of second sighting.
fn duplicates<'v>(values: impl Iterator<Item = &'v str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    values
        .filter(|v| !seen.insert(*v))
        .filter(|v| reported.insert(*v))
        .map(str::to_string)
        .collect()
}
