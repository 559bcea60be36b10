//! Core error types for focusfalcon-core.
//!
//! This module defines the error hierarchy using thiserror. The decision path
//! itself never returns these to its caller (it degrades toward "allow"); they
//! surface from user-initiated operations such as editing the blocked-site list
//! or starting a focus session.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusfalcon-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted key-value store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Blocked-site list errors
    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    /// Focus session / pause transition errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Browser host call failures
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// In-memory store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,

    /// Stored value is not valid JSON
    #[error("Stored value for '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Store is not reachable at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to locate the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Time is not a zero-padded 24-hour HH:MM value
    #[error("Invalid time '{0}': expected zero-padded 24-hour HH:MM")]
    InvalidTime(String),

    /// Weekday index outside 0 (Sunday) ..= 6 (Saturday)
    #[error("Invalid weekday index {0}: expected 0 (Sunday) to 6 (Saturday)")]
    InvalidWeekday(u8),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Blocked-site list errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    #[error("'{0}' is not a valid domain")]
    InvalidDomain(String),

    #[error("'{0}' is already blocked")]
    Duplicate(String),

    #[error("'{0}' is not in the blocked list")]
    NotFound(String),
}

/// Focus session and pause transition errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Focus session duration must be at least one minute")]
    InvalidDuration,

    #[error("No focus session is running")]
    NoActiveSession,

    #[error("Blocking is already paused")]
    AlreadyPaused,

    #[error("The blocking schedule is not active right now")]
    ScheduleNotActive,

    #[error("Action '{0}' was not confirmed")]
    NotConfirmed(String),
}

/// Browser host call errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The platform does not offer this capability
    #[error("Capability not available: {0}")]
    Unsupported(String),

    /// The platform call was made and rejected
    #[error("Host call '{call}' failed: {message}")]
    CallFailed { call: String, message: String },
}

impl HostError {
    pub fn call_failed(call: &str, message: impl Into<String>) -> Self {
        HostError::CallFailed {
            call: call.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
