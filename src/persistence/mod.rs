//! Key-value persistence
//!
//! The leaderboard and settings are each stored as one JSON string under a
//! fixed key. Backends:
//! - [`MemoryStore`]: tests and headless runs
//! - [`FileStore`]: native, one file per key
//! - `platform::web::LocalStorage`: browser `localStorage`

mod file;

pub use file::FileStore;

use std::collections::HashMap;

use thiserror::Error;

/// Failure to read or write a stored value
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage rejected write for key {key}")]
    Rejected { key: String },
}

/// A string-keyed store holding serialized values
pub trait KeyValueStore {
    /// Read a value; absent keys and read failures both yield `None`
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
