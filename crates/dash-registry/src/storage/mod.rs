//! Session-scoped key/value storage used for the external registry cache

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::RegistryResult;

/// Well-known storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStorageKey {
    /// Serialized [`crate::api::ExternalRegistries`]
    ExternalRegistries,
}

impl SessionStorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStorageKey::ExternalRegistries => "external-registries",
        }
    }
}

impl fmt::Display for SessionStorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized-string storage that lives as long as the user's session.
///
/// Values are opaque text; callers own the encoding.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: SessionStorageKey) -> RegistryResult<Option<String>>;

    fn update(&self, key: SessionStorageKey, value: String) -> RegistryResult<()>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Arc<T> {
    fn get(&self, key: SessionStorageKey) -> RegistryResult<Option<String>> {
        (**self).get(key)
    }

    fn update(&self, key: SessionStorageKey, value: String) -> RegistryResult<()> {
        (**self).update(key, value)
    }
}

/// Process-local storage, one per dashboard session
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    values: DashMap<SessionStorageKey, String>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored value
    pub fn clear(&self) {
        self.values.clear();
    }
}

impl SessionStorage for InMemoryStorage {
    fn get(&self, key: SessionStorageKey) -> RegistryResult<Option<String>> {
        Ok(self.values.get(&key).map(|value| value.clone()))
    }

    fn update(&self, key: SessionStorageKey, value: String) -> RegistryResult<()> {
        self.values.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get(SessionStorageKey::ExternalRegistries).unwrap(), None);
    }

    #[test]
    fn test_update_overwrites() {
        let storage = InMemoryStorage::new();
        let key = SessionStorageKey::ExternalRegistries;

        storage.update(key, "{}".to_string()).unwrap();
        storage.update(key, r#"{"a":1}"#.to_string()).unwrap();
        assert_eq!(storage.get(key).unwrap().as_deref(), Some(r#"{"a":1}"#));

        storage.clear();
        assert_eq!(storage.get(key).unwrap(), None);
    }

    #[test]
    fn test_shared_through_arc() {
        let storage = Arc::new(InMemoryStorage::new());
        let handle: Arc<dyn SessionStorage> = storage.clone();

        handle.update(SessionStorageKey::ExternalRegistries, "x".to_string()).unwrap();
        assert_eq!(
            storage.get(SessionStorageKey::ExternalRegistries).unwrap().as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_key_name() {
        assert_eq!(SessionStorageKey::ExternalRegistries.to_string(), "external-registries");
    }
}
