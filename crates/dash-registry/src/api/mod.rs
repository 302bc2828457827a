//! Devfile registry index types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named links of a devfile, in registry order
pub type DevfileLinks = IndexMap<String, LinkValue>;

/// Metadata record for one devfile as listed by a registry index
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevfileMetaData {
    /// Human readable name
    pub display_name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon location, possibly relative to the registry
    #[serde(default)]
    pub icon: String,
    /// Registry the record was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    /// Memory limit hint for workspaces created from this devfile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_memory_limit: Option<String>,
    /// Tags, in registry order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Links to the devfile and its per-editor variants
    #[serde(default)]
    pub links: DevfileLinks,
    /// Registry fields not modelled above (`name`, `version`, `language`,
    /// ...), kept so records round-trip as published
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A link entry: either a URL or a nested group of named links
/// (e.g. `devWorkspaces` keyed by editor id).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LinkValue {
    Href(String),
    Nested(IndexMap<String, LinkValue>),
    /// Anything else a registry may put in `links`; carried through untouched.
    Other(serde_json::Value),
}

impl LinkValue {
    /// The URL when this is a leaf link
    pub fn as_href(&self) -> Option<&str> {
        match self {
            LinkValue::Href(href) => Some(href),
            _ => None,
        }
    }

    /// The named children when this is a group of links
    pub fn as_nested(&self) -> Option<&IndexMap<String, LinkValue>> {
        match self {
            LinkValue::Nested(links) => Some(links),
            _ => None,
        }
    }

    /// Walk a path of keys through nested groups
    pub fn get_path(&self, path: &[&str]) -> Option<&LinkValue> {
        path.iter()
            .try_fold(self, |value, key| value.as_nested()?.get(*key))
    }
}

impl From<&str> for LinkValue {
    fn from(href: &str) -> Self {
        LinkValue::Href(href.to_string())
    }
}

impl From<String> for LinkValue {
    fn from(href: String) -> Self {
        LinkValue::Href(href)
    }
}

impl<K: Into<String>> FromIterator<(K, LinkValue)> for LinkValue {
    fn from_iter<I: IntoIterator<Item = (K, LinkValue)>>(iter: I) -> Self {
        LinkValue::Nested(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Cached index of one external registry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExternalRegistryEntry {
    pub metadata: Vec<DevfileMetaData>,
}

/// All cached external registries, keyed by index URL
pub type ExternalRegistries = IndexMap<String, ExternalRegistryEntry>;
