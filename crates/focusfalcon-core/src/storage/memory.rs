//! In-process key-value store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::KeyValueStore;
use crate::error::StorageError;

/// Mutex-guarded map implementing [`KeyValueStore`].
///
/// Used when embedding the core in a host that owns persistence itself, and
/// throughout the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given entries.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    /// Snapshot of every stored entry.
    pub fn entries(&self) -> Result<BTreeMap<String, Value>, StorageError> {
        Ok(self.entries.lock().map_err(|_| StorageError::Poisoned)?.clone())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(*k).map(|v| ((*k).to_string(), v.clone())))
            .collect())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        store.set("avatar", json!("falcon")).unwrap();
        let got = store.get(&["avatar", "missing"]).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["avatar"], json!("falcon"));
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryStore::with_entries([("avatar", json!("falcon"))]);
        store.set("avatar", json!("redPanda")).unwrap();
        assert_eq!(store.get(&["avatar"]).unwrap()["avatar"], json!("redPanda"));
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemoryStore::new();
        store.remove("nothing").unwrap();
        assert!(store.entries().unwrap().is_empty());
    }
}
