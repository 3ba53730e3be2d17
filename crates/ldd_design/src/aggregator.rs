//! Design aggregation.
//!
//! Merges a scan of the component tree and the discovered property schemas
//! into a fresh [`DesignDocument`]. The previously persisted document only
//! contributes ordering (and its uninterpreted top-level keys), so repeated
//! runs produce low-diff output.

use std::path::PathBuf;

use tracing::info;

use crate::error::DesignResult;
use crate::models::{AsyncComponent, DesignDocument, Group};
use crate::properties::PropertyLoader;
use crate::scanner::{log_summary, ComponentScanner, ScanFailure, ScannedGroup, TreeScan};

/// Result of one aggregation pass.
#[derive(Debug, Default)]
pub struct MapReport {
    pub document: DesignDocument,
    pub async_components: Vec<AsyncComponent>,
    pub failures: Vec<ScanFailure>,
    /// Stray files removed from the component tree
    pub repaired: Vec<PathBuf>,
}

impl MapReport {
    /// Whether every group and property file was scanned.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds design documents from a component tree.
pub struct DesignAggregator {
    scanner: ComponentScanner,
    properties: PropertyLoader,
}

impl DesignAggregator {
    pub fn new(scanner: ComponentScanner, properties: PropertyLoader) -> Self {
        Self {
            scanner,
            properties,
        }
    }

    /// Rebuild the design from the tree, ordering groups after `previous`.
    pub fn aggregate(&self, previous: &DesignDocument) -> DesignResult<MapReport> {
        let scan = self.scanner.scan()?;
        log_summary(&scan);

        let TreeScan {
            groups: scanned,
            mut failures,
            repaired,
        } = scan;

        let groups = merge_groups(&previous.groups, &scanned);

        let mut document = previous.clone();
        document.groups = groups;
        document.components = scanned
            .iter()
            .flat_map(|g| g.components.iter().map(|c| c.declaration.clone()))
            .collect();

        let async_components = scanned
            .iter()
            .flat_map(|g| g.components.iter().filter_map(|c| c.async_component.clone()))
            .collect();

        let merge = self.properties.merge_all(self.scanner.root());
        document.component_properties = merge.properties;
        failures.extend(merge.failures.into_iter().map(|(path, message)| ScanFailure {
            scope: path.display().to_string(),
            message,
        }));

        info!(
            "Mapped {} groups, {} components and {} properties",
            document.groups.len(),
            document.components.len(),
            document.component_properties.len()
        );

        Ok(MapReport {
            document,
            async_components,
            failures,
            repaired,
        })
    }
}

/// Order the scanned groups after the previous ones.
///
/// Known groups keep their position and component order, new groups are
/// appended in scan order, and groups no longer on disk are dropped. A group
/// whose scan failed is absent from `scanned` and is dropped as well, so every
/// group member names a component of the same pass.
pub fn merge_groups(previous: &[Group], scanned: &[ScannedGroup]) -> Vec<Group> {
    let mut pending: Vec<Option<&ScannedGroup>> = scanned.iter().map(Some).collect();
    let mut groups = Vec::with_capacity(scanned.len());

    for old in previous {
        let matched = pending
            .iter_mut()
            .find(|slot| slot.is_some_and(|g| g.label == old.label))
            .and_then(Option::take);

        if let Some(group) = matched {
            groups.push(Group::new(
                group.label.clone(),
                order_components(&old.components, group.component_names()),
            ));
        }
    }

    groups.extend(
        pending
            .into_iter()
            .flatten()
            .map(|g| Group::new(g.label.clone(), g.component_names())),
    );
    groups
}

/// Keep survivors in their recorded order and append new components.
pub fn order_components(previous: &[String], mut current: Vec<String>) -> Vec<String> {
    let mut ordered = Vec::with_capacity(current.len());
    for name in previous {
        if let Some(index) = current.iter().position(|c| c == name) {
            ordered.push(current.remove(index));
        }
    }
    ordered.extend(current);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentDeclaration;
    use crate::scanner::ScannedComponent;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn scanned(label: &str, components: &[&str]) -> ScannedGroup {
        ScannedGroup {
            folder: label.to_string(),
            label: label.to_string(),
            components: components
                .iter()
                .map(|name| ScannedComponent {
                    folder: name.to_string(),
                    declaration: ComponentDeclaration::new(*name, ""),
                    async_component: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_order_components() {
        assert_eq!(
            order_components(&names(&["a", "b", "c"]), names(&["a", "c", "d"])),
            names(&["a", "c", "d"])
        );
        assert_eq!(
            order_components(&names(&["c", "a", "c"]), names(&["a", "b", "c"])),
            names(&["c", "a", "b"])
        );
        assert_eq!(order_components(&[], names(&["x", "y"])), names(&["x", "y"]));
    }

    #[test]
    fn test_merge_groups_keeps_known_positions() {
        let previous = vec![
            Group::new("Titles", names(&["title-h2", "title-h1"])),
            Group::new("Removed", names(&["gone"])),
            Group::new("Text", names(&["quote", "paragraph"])),
        ];
        let scan = vec![
            scanned("Media", &["image"]),
            scanned("Text", &["lead", "paragraph", "quote"]),
            scanned("Titles", &["title-h1", "title-h2"]),
        ];

        let groups = merge_groups(&previous, &scan);

        assert_eq!(
            groups,
            vec![
                Group::new("Titles", names(&["title-h2", "title-h1"])),
                Group::new("Text", names(&["quote", "paragraph", "lead"])),
                Group::new("Media", names(&["image"])),
            ]
        );
    }

    #[test]
    fn test_unscanned_group_is_dropped() {
        let previous = vec![
            Group::new("Media", names(&["image", "video"])),
            Group::new("Text", names(&["paragraph"])),
        ];

        let groups = merge_groups(&previous, &[scanned("Text", &["paragraph", "lead"])]);

        assert_eq!(groups, vec![Group::new("Text", names(&["paragraph", "lead"]))]);
    }

    #[test]
    fn test_folders_with_same_label_stay_separate() {
        let previous = vec![Group::new("Text", names(&["a"]))];
        let scan = vec![scanned("Text", &["a"]), scanned("Text", &["b"])];

        let groups = merge_groups(&previous, &scan);
        assert_eq!(
            groups,
            vec![Group::new("Text", names(&["a"])), Group::new("Text", names(&["b"]))]
        );
    }
}
