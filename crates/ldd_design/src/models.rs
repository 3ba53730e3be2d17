//! Data models for the design document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parent name that stands for the editor's top-level container.
pub const ROOT_PARENT: &str = "root";

/// The aggregated description of all groups, components and property schemas.
///
/// Top-level keys this crate does not interpret (`name`, `version`, `assets`,
/// ...) are kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub components: Vec<ComponentDeclaration>,
    #[serde(default)]
    pub component_properties: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesignDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&ComponentDeclaration> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Look up a group by label.
    pub fn group(&self, label: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    /// Set the top-level `name` and `version` keys of the design.
    pub fn stamp(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.extra.insert("name".to_string(), Value::String(name.into()));
        self.extra
            .insert("version".to_string(), Value::String(version.into()));
    }

    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.extra.get("version").and_then(Value::as_str)
    }
}

/// A named bucket of components shown together in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    #[serde(default)]
    pub components: Vec<String>,
}

impl Group {
    pub fn new(label: impl Into<String>, components: Vec<String>) -> Self {
        Self {
            label: label.into(),
            components,
        }
    }

    pub fn contains(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }
}

/// A reusable content template with its directive and structural metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDeclaration {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directives: Option<BTreeMap<String, DirectiveSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_parents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentDeclaration {
    pub fn new(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_directive(mut self, name: impl Into<String>, spec: DirectiveSpec) -> Self {
        self.directives
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), spec);
        self
    }

    pub fn with_allowed_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_parents = Some(parents.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    /// Property names this component opts into.
    pub fn property_names(&self) -> &[String] {
        self.properties.as_deref().unwrap_or_default()
    }

    pub fn uses_property(&self, property: &str) -> bool {
        self.property_names().iter().any(|p| p == property)
    }
}

/// Declaration of one directive value used in a component's markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content: Option<Vec<DefaultContent>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DirectiveSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default_content<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_content = Some(
            components
                .into_iter()
                .map(|c| DefaultContent::new(c))
                .collect(),
        );
        self
    }

    /// Whether this directive constrains or pre-fills child components.
    pub fn references_components(&self) -> bool {
        self.allowed_children.as_ref().is_some_and(|c| !c.is_empty())
            || self.default_content.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Every component name referenced through `allowedChildren` and `defaultContent`.
    pub fn referenced_components(&self) -> impl Iterator<Item = &str> {
        let children = self.allowed_children.iter().flatten().map(String::as_str);
        let defaults = self
            .default_content
            .iter()
            .flatten()
            .map(|d| d.component.as_str());
        children.chain(defaults)
    }
}

/// A component placed into a container by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultContent {
    pub component: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DefaultContent {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            extra: Map::new(),
        }
    }
}

/// A dynamically loadable UI component discovered next to a design component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncComponent {
    /// Registration identifier, e.g. `SrlLdTitleH1`.
    pub name: String,
    /// Import path, e.g. `#ld/Titles/title-h1/title-h1.vue`.
    pub path: String,
}
