//! DevWorkspace custom resource types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEVWORKSPACE_API_VERSION: &str = "workspace.devfile.io/v1alpha2";
pub const DEVWORKSPACE_KIND: &str = "DevWorkspace";

/// A DevWorkspace object. `spec` and `status` are kept as raw JSON; the
/// dashboard plumbing only reads metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevWorkspace {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

/// Subset of Kubernetes object metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub resource_version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl DevWorkspace {
    /// New workspace with an empty spec
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_version: DEVWORKSPACE_API_VERSION.to_string(),
            kind: DEVWORKSPACE_KIND.to_string(),
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
                ..ObjectMeta::default()
            },
            spec: serde_json::Value::Object(Default::default()),
            status: None,
        }
    }

    /// Identifier passed to `on_deleted`
    pub fn id(&self) -> &str {
        &self.metadata.uid
    }

    /// `<namespace>/<name>`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_devworkspace() {
        let json = serde_json::json!({
            "apiVersion": "workspace.devfile.io/v1alpha2",
            "kind": "DevWorkspace",
            "metadata": {
                "name": "wksp",
                "namespace": "user-che",
                "uid": "1234",
                "resourceVersion": "42",
                "annotations": { "che.eclipse.org/devfile-source": "url" }
            },
            "spec": { "started": true }
        });

        let workspace: DevWorkspace = serde_json::from_value(json).unwrap();
        assert_eq!(workspace.qualified_name(), "user-che/wksp");
        assert_eq!(workspace.id(), "1234");
        assert_eq!(workspace.metadata.resource_version, "42");
        assert_eq!(workspace.spec["started"], serde_json::json!(true));
        assert!(workspace.status.is_none());
    }
}
