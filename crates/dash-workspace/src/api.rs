//! The DevWorkspace API consumed by the dashboard

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::DevWorkspace;
use crate::WorkspaceResult;

/// Receives the events of a namespace watch.
///
/// Failures of an established watch are reported through `on_error` as a
/// message such as `"Error: Forbidden"`, never as a returned error.
pub trait WatchCallbacks: Send + Sync {
    fn on_added(&self, workspace: DevWorkspace);

    fn on_modified(&self, workspace: DevWorkspace);

    fn on_deleted(&self, workspace_id: String);

    fn on_error(&self, error: String);
}

#[async_trait]
pub trait DevWorkspaceApi: Send + Sync {
    /// Read one workspace.
    ///
    /// Errors read `unable to get devworkspace <namespace>/<name>: <reason>`.
    async fn get_by_name(&self, namespace: &str, name: &str) -> WorkspaceResult<DevWorkspace>;

    /// Start watching `namespace` from `resource_version` (empty for "now").
    ///
    /// Only invalid arguments fail here; everything after the watch is
    /// started goes to `callbacks`.
    async fn watch_in_namespace(
        &self,
        namespace: &str,
        resource_version: &str,
        callbacks: Arc<dyn WatchCallbacks>,
    ) -> WorkspaceResult<()>;
}
