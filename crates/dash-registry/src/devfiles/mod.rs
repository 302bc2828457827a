//! Devfile registry metadata: fetching, the external registry cache, and
//! resolution of registry-relative tags, links and icons.
//!
//! Internal registries live next to the dashboard and publish
//! `devfiles/index.json` with links relative to the registry root. External
//! registries (e.g. registry.devfile.io) publish `index` and identify each
//! devfile by a `self` link of the form `<catalog>/<name>:<version>`.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use dash_core::error::DashError;
use dash_core::types::RegistrySource;
use crate::api::{DevfileLinks, DevfileMetaData, ExternalRegistryEntry, LinkValue};
use crate::fetch::FetchData;
use crate::storage::{SessionStorage, SessionStorageKey};
use crate::RegistryResult;

/// Tag added to every devfile coming from an external registry
pub const DEVFILE_IO_TAG: &str = "Devfile.io";

/// Fetches registry indexes, caching external ones in session storage
#[derive(Debug, Clone)]
pub struct DevfileRegistry<F, S> {
    fetcher: F,
    storage: S,
}

impl<F: FetchData, S: SessionStorage> DevfileRegistry<F, S> {
    pub fn new(fetcher: F, storage: S) -> Self {
        Self { fetcher, storage }
    }

    /// Fetch the metadata list of one registry.
    ///
    /// Internal registries are fetched every time and never cached. External
    /// registries are served from the session cache when it holds an entry
    /// for their index URL; otherwise the index is fetched and stored. The
    /// records are returned as published, without link resolution.
    pub async fn fetch_registry_metadata(
        &self,
        base_url: &str,
        is_external: bool,
    ) -> RegistryResult<Vec<DevfileMetaData>> {
        let index_location = registry_index_location(base_url, is_external)?;

        if !is_external {
            return self.fetcher.fetch_data(&index_location).await;
        }

        let mut registries = self.external_registries()?;
        if let Some(entry) = registries
            .get(&index_location)
            .and_then(|raw| cached_entry(&index_location, raw))
        {
            debug!(index = %index_location, "external registry served from session cache");
            return Ok(entry.metadata);
        }

        let metadata = self.fetcher.fetch_data(&index_location).await?;
        debug!(index = %index_location, records = metadata.len(), "caching external registry");
        let entry = serde_json::to_value(ExternalRegistryEntry { metadata: metadata.clone() })?;
        registries.insert(index_location, entry);
        self.storage.update(
            SessionStorageKey::ExternalRegistries,
            serde_json::to_string(&registries)?,
        )?;

        Ok(metadata)
    }

    /// Fetch and resolve the devfiles of several registries, in order.
    pub async fn fetch_devfiles(
        &self,
        registries: &[RegistrySource],
    ) -> RegistryResult<Vec<DevfileMetaData>> {
        let mut devfiles = Vec::new();
        for registry in registries {
            let metadata = self.fetch_registry_metadata(&registry.url, registry.external).await?;
            devfiles.extend(
                metadata
                    .iter()
                    .map(|meta| resolve_metadata(meta, &registry.url, registry.external)),
            );
        }
        Ok(devfiles)
    }

    /// Cached external registries, still undecoded per index URL. A blob that
    /// is not a JSON object counts as empty.
    fn external_registries(&self) -> RegistryResult<IndexMap<String, serde_json::Value>> {
        let key = SessionStorageKey::ExternalRegistries;
        let Some(stored) = self.storage.get(key)? else {
            return Ok(IndexMap::new());
        };

        match serde_json::from_str(&stored) {
            Ok(registries) => Ok(registries),
            Err(e) => {
                warn!(%key, "ignoring unreadable external registry cache: {}", e);
                Ok(IndexMap::new())
            }
        }
    }
}

/// Decode the cached entry of one index URL; a malformed entry is a miss.
fn cached_entry(index_location: &str, raw: &serde_json::Value) -> Option<ExternalRegistryEntry> {
    match ExternalRegistryEntry::deserialize(raw) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(index = %index_location, "ignoring malformed external registry cache entry: {}", e);
            None
        }
    }
}

/// URL of a registry's index: `<base>/index` for external registries,
/// `<base>/devfiles/index.json` for internal ones.
pub fn registry_index_location(base_url: &str, is_external: bool) -> RegistryResult<String> {
    let base = with_trailing_slash(base_url);
    let base = Url::parse(&base).map_err(|e| DashError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    let index = if is_external { "index" } else { "devfiles/index.json" };
    base.join(index)
        .map(String::from)
        .map_err(|e| DashError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })
}

/// Tags to display for `metadata`.
///
/// External devfiles get [`DEVFILE_IO_TAG`] appended. This is not
/// idempotent: feeding the result back in appends the tag again.
pub fn resolve_tags(metadata: &DevfileMetaData, _base_url: &str, is_external: bool) -> Vec<String> {
    let mut tags = metadata.tags.clone();
    if is_external {
        tags.push(DEVFILE_IO_TAG.to_string());
    }
    tags
}

/// Absolute links of `metadata`.
///
/// Internal: every relative link, at any depth, is prefixed with `base_url`.
/// External: the `self` link is replaced by a `v2` link to the devfile in the
/// registry; a missing or malformed `self` leaves the links as they are.
pub fn resolve_links(metadata: &DevfileMetaData, base_url: &str, is_external: bool) -> DevfileLinks {
    if !is_external {
        return metadata
            .links
            .iter()
            .map(|(name, value)| (name.clone(), update_object_links(value, base_url)))
            .collect();
    }

    let mut links = metadata.links.clone();
    let Some((name, version)) = links
        .get("self")
        .and_then(LinkValue::as_href)
        .and_then(parse_self_link)
    else {
        return links;
    };

    let v2 = format!("{}devfiles/{}/{}", with_trailing_slash(base_url), name, version);
    links.shift_remove("self");
    links.insert("v2".to_string(), LinkValue::Href(v2));
    links
}

/// Rewrite every relative link in `value` against `base_url`, keeping the
/// shape and key order. Absolute links and non-link leaves are unchanged.
pub fn update_object_links(value: &LinkValue, base_url: &str) -> LinkValue {
    match value {
        LinkValue::Href(href) => LinkValue::Href(absolute_link(href, base_url)),
        LinkValue::Nested(links) => LinkValue::Nested(
            links
                .iter()
                .map(|(name, value)| (name.clone(), update_object_links(value, base_url)))
                .collect(),
        ),
        LinkValue::Other(other) => LinkValue::Other(other.clone()),
    }
}

/// Absolute icon location of `metadata`
pub fn resolve_icon(metadata: &DevfileMetaData, base_url: &str, is_external: bool) -> String {
    let icon = &metadata.icon;
    if icon.is_empty() || is_absolute(icon) {
        return icon.clone();
    }
    if is_external {
        format!("{}{}", with_trailing_slash(base_url), icon.trim_start_matches('/'))
    } else {
        absolute_link(icon, base_url)
    }
}

/// Copy of `metadata` with tags, links and icon resolved
pub fn resolve_metadata(metadata: &DevfileMetaData, base_url: &str, is_external: bool) -> DevfileMetaData {
    DevfileMetaData {
        icon: resolve_icon(metadata, base_url, is_external),
        tags: resolve_tags(metadata, base_url, is_external),
        links: resolve_links(metadata, base_url, is_external),
        ..metadata.clone()
    }
}

fn is_absolute(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

fn absolute_link(link: &str, base_url: &str) -> String {
    if is_absolute(link) {
        link.to_string()
    } else {
        format!("{}{}", base_url, link)
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// `<catalog>/<name>:<version>` -> (`name`, `version`)
fn parse_self_link(self_link: &str) -> Option<(&str, &str)> {
    let devfile = self_link.rsplit('/').next()?;
    let (name, version) = devfile.split_once(':')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name, version))
}
