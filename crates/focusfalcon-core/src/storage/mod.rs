mod config;
pub mod database;
pub mod memory;
pub mod state;

pub use config::{BlockingConfig, CacheConfig, Config, SessionConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use state::{keys, StateSnapshot, StateStore};

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{ConfigError, StorageError};

/// Uniform get/set/remove over persisted key-value state.
///
/// Values are JSON-shaped. There is no validation and no transaction support:
/// the last write wins, and callers supply defaults for absent keys.
pub trait KeyValueStore {
    /// Fetch the given keys. Keys that are not stored are absent from the map.
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        (**self).get(keys)
    }
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        (**self).get(keys)
    }
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        (**self).get(keys)
    }
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        (**self).get(keys)
    }
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `FOCUSFALCON_DATA_DIR` wins when set. Otherwise this is
/// `~/.config/focusfalcon[-dev]/` based on FOCUSFALCON_ENV
/// (set FOCUSFALCON_ENV=dev to use the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSFALCON_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("FOCUSFALCON_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focusfalcon-dev")
            } else {
                base_dir.join("focusfalcon")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
