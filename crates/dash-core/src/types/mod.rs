//! Types shared between the registry, config and CLI crates.

use serde::{Deserialize, Serialize};

/// A devfile registry the dashboard reads metadata from.
///
/// Internal registries are served next to the dashboard and expose a
/// `devfiles/index.json`; external ones are hosted catalogs exposing `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySource {
    /// Base URL of the registry
    pub url: String,
    /// Whether this is a third-party hosted catalog
    #[serde(default)]
    pub external: bool,
}

impl RegistrySource {
    /// Registry served by the dashboard's own origin
    pub fn internal(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            external: false,
        }
    }

    /// Third-party hosted registry
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            external: true,
        }
    }
}
