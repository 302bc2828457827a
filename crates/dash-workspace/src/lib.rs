//! DevWorkspace API contract for the dashboard
//!
//! The dashboard does not talk to Kubernetes itself; it consumes an API
//! exposing `get_by_name` and `watch_in_namespace`. This crate defines that
//! contract, the error messages callers depend on, and an in-memory
//! implementation used to exercise the contract without a cluster.

pub mod api;
pub mod errors;
pub mod fake;
pub mod types;

// Re-export main types
pub use api::{DevWorkspaceApi, WatchCallbacks};
pub use errors::{error_message, with_context, NO_RESPONSE_MESSAGE};
pub use fake::{ClusterAccess, FakeDevWorkspaceApi};
pub use types::{DevWorkspace, ObjectMeta, DEVWORKSPACE_API_VERSION, DEVWORKSPACE_KIND};

use dash_core::error::DashError;

/// Result type for workspace operations
pub type WorkspaceResult<T> = Result<T, DashError>;
