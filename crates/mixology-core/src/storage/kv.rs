//! Namespaced key-value persistence contract.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::StorageError;

/// Durable string store partitioned into namespaces.
///
/// Writes replace the whole value under a key; there are no transactions
/// spanning keys.
pub trait KeyValueStore: Send {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Every key in `namespace`, sorted.
    fn keys(&self, namespace: &str) -> Result<Vec<String>, StorageError>;
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<(String, String), String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("memory store poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .lock()?
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.lock()?
            .remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, k)| k.clone())
            .collect())
    }
}

impl<S: KeyValueStore + Sync> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(namespace, key)
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(namespace, key, value)
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        (**self).remove(namespace, key)
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
        (**self).keys(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.set("lists", "favourites", "[]").unwrap();
        store.set("challenge_best", "favourites", "12").unwrap();
        assert_eq!(store.get("lists", "favourites").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys("challenge_best").unwrap(), vec!["favourites"]);
    }

    #[test]
    fn set_overwrites_and_remove_clears() {
        let store = MemoryStore::new();
        store.set("ns", "k", "1").unwrap();
        store.set("ns", "k", "2").unwrap();
        assert_eq!(store.get("ns", "k").unwrap().as_deref(), Some("2"));
        store.remove("ns", "k").unwrap();
        assert!(store.get("ns", "k").unwrap().is_none());
    }
}
