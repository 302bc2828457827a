//! In-memory DevWorkspace API
//!
//! Behaves like the cluster-backed API from the caller's point of view:
//! same error messages, events delivered through [`WatchCallbacks`]. Access
//! to the "cluster" can be degraded to simulate a revoked token or an
//! unreachable API server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use dash_core::error::DashError;
use crate::api::{DevWorkspaceApi, WatchCallbacks};
use crate::errors::{with_context, NO_RESPONSE_MESSAGE};
use crate::types::DevWorkspace;
use crate::WorkspaceResult;

const RESOURCE: &str = "devworkspaces";
const API_GROUP: &str = "workspace.devfile.io";

/// How requests reach the simulated cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterAccess {
    /// Valid credentials
    Authorized,
    /// Token dropped: requests run as `system:anonymous`
    Anonymous,
    /// API server cannot be reached
    Unreachable,
}

struct Watcher {
    namespace: String,
    callbacks: Arc<dyn WatchCallbacks>,
}

pub struct FakeDevWorkspaceApi {
    workspaces: DashMap<String, DevWorkspace>,
    watchers: DashMap<u64, Watcher>,
    access: RwLock<ClusterAccess>,
    revision: AtomicU64,
}

impl FakeDevWorkspaceApi {
    pub fn new() -> Self {
        Self {
            workspaces: DashMap::new(),
            watchers: DashMap::new(),
            access: RwLock::new(ClusterAccess::Authorized),
            revision: AtomicU64::new(0),
        }
    }

    pub fn set_access(&self, access: ClusterAccess) {
        *self.access.write().unwrap_or_else(PoisonError::into_inner) = access;
    }

    fn access(&self) -> ClusterAccess {
        self.access.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Store `workspace`, assigning uid and resourceVersion, and notify watchers
    pub fn create(&self, mut workspace: DevWorkspace) -> DevWorkspace {
        let revision = self.next_revision();
        if workspace.metadata.uid.is_empty() {
            workspace.metadata.uid = format!("uid-{}", revision);
        }
        workspace.metadata.resource_version = revision.to_string();
        self.workspaces.insert(workspace.qualified_name(), workspace.clone());

        self.notify(&workspace.metadata.namespace, |callbacks| {
            callbacks.on_added(workspace.clone())
        });
        workspace
    }

    /// Replace a stored workspace and notify watchers
    pub fn update(&self, mut workspace: DevWorkspace) -> WorkspaceResult<DevWorkspace> {
        let key = workspace.qualified_name();
        let uid = self.workspaces
            .get(&key)
            .map(|stored| stored.value().metadata.uid.clone())
            .ok_or_else(|| not_found(&workspace.metadata.namespace, &workspace.metadata.name))?;

        workspace.metadata.uid = uid;
        workspace.metadata.resource_version = self.next_revision().to_string();
        self.workspaces.insert(key, workspace.clone());

        self.notify(&workspace.metadata.namespace, |callbacks| {
            callbacks.on_modified(workspace.clone())
        });
        Ok(workspace)
    }

    /// Remove a workspace and notify watchers with its uid
    pub fn delete(&self, namespace: &str, name: &str) -> WorkspaceResult<()> {
        let (_, workspace) = self.workspaces
            .remove(&format!("{}/{}", namespace, name))
            .ok_or_else(|| not_found(namespace, name))?;
        self.next_revision();

        self.notify(namespace, |callbacks| callbacks.on_deleted(workspace.id().to_string()));
        Ok(())
    }

    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn notify(&self, namespace: &str, event: impl Fn(&dyn WatchCallbacks)) {
        // Collect first so callbacks may start new watches
        let targets: Vec<_> = self.watchers
            .iter()
            .filter(|watcher| watcher.namespace == namespace)
            .map(|watcher| watcher.callbacks.clone())
            .collect();

        debug!(namespace, watchers = targets.len(), "dispatching devworkspace event");
        for callbacks in targets {
            event(callbacks.as_ref());
        }
    }
}

impl Default for FakeDevWorkspaceApi {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(namespace: &str, name: &str) -> DashError {
    with_context(
        DashError::Http {
            status: 404,
            message: format!("{}.{} \"{}\" not found", RESOURCE, API_GROUP, name),
        },
        &format!("unable to get devworkspace {}/{}", namespace, name),
    )
}

#[async_trait]
impl DevWorkspaceApi for FakeDevWorkspaceApi {
    async fn get_by_name(&self, namespace: &str, name: &str) -> WorkspaceResult<DevWorkspace> {
        let context = format!("unable to get devworkspace {}/{}", namespace, name);

        match self.access() {
            ClusterAccess::Unreachable => Err(with_context(
                DashError::Network {
                    message: "connection refused".to_string(),
                    source: None,
                },
                &context,
            )),
            ClusterAccess::Anonymous => Err(with_context(
                DashError::Http {
                    status: 403,
                    message: format!(
                        "{resource}.{group} \"{name}\" is forbidden: User \"system:anonymous\" \
                         cannot get resource \"{resource}\" in API group \"{group}\" in the namespace \"{namespace}\"",
                        resource = RESOURCE,
                        group = API_GROUP,
                        name = name,
                        namespace = namespace,
                    ),
                },
                &context,
            )),
            ClusterAccess::Authorized => self.workspaces
                .get(&format!("{}/{}", namespace, name))
                .map(|workspace| workspace.value().clone())
                .ok_or_else(|| not_found(namespace, name)),
        }
    }

    async fn watch_in_namespace(
        &self,
        namespace: &str,
        resource_version: &str,
        callbacks: Arc<dyn WatchCallbacks>,
    ) -> WorkspaceResult<()> {
        if namespace.is_empty() {
            return Err(DashError::Workspace {
                message: "namespace is required to watch devworkspaces".to_string(),
            });
        }
        if !resource_version.is_empty() && resource_version.parse::<u64>().is_err() {
            return Err(DashError::Workspace {
                message: format!("invalid resourceVersion '{}'", resource_version),
            });
        }

        match self.access() {
            ClusterAccess::Anonymous => callbacks.on_error("Error: Forbidden".to_string()),
            ClusterAccess::Unreachable => callbacks.on_error(format!("Error: {}", NO_RESPONSE_MESSAGE)),
            ClusterAccess::Authorized => {
                let id = self.next_revision();
                debug!(namespace, resource_version, "watching devworkspaces");
                self.watchers.insert(id, Watcher {
                    namespace: namespace.to_string(),
                    callbacks,
                });
            }
        }
        Ok(())
    }
}
