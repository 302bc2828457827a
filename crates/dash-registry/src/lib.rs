//! Devfile registry client for the workspace dashboard
//!
//! This crate provides the HTTP plumbing the dashboard uses to talk to its
//! backend and to devfile registries: a retrying request wrapper, a registry
//! metadata fetcher with an external-registry session cache, and the link
//! resolution that turns registry-relative links into absolute URLs.

pub mod api;
pub mod client;
pub mod devfiles;
pub mod fetch;
pub mod storage;

// Re-export main types
pub use api::{DevfileLinks, DevfileMetaData, ExternalRegistries, ExternalRegistryEntry, LinkValue};
pub use client::{
    AuthConfig, HttpClient, HttpResponse, ReqwestClient, RetryingClient,
    BEARER_TOKEN_AUTHORIZATION_IS_REQUIRED_ERROR_MSG, MAX_RETRIES,
};
pub use devfiles::{
    registry_index_location, resolve_icon, resolve_links, resolve_metadata, resolve_tags,
    update_object_links, DevfileRegistry, DEVFILE_IO_TAG,
};
pub use fetch::{FetchData, HttpFetcher};
pub use storage::{InMemoryStorage, SessionStorage, SessionStorageKey};

use dash_core::error::DashError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, DashError>;
