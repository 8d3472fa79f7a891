//! Port interface for key-value persistence
//!
//! Credentials, the cached identity and entity cache envelopes are all stored
//! as strings under fixed keys. Callers treat every error as "no value".

use carelink_domain::CareLinkError;
use thiserror::Error;

/// Failure reported by a [`KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(String),

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for CareLinkError {
    fn from(err: StorageError) -> Self {
        CareLinkError::Storage(err.to_string())
    }
}

/// String key-value storage surviving application restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
