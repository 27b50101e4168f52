//! Storage media the task store persists into.
//!
//! A medium is a flat, synchronous string key-value store that can enumerate
//! its keys, the same shape as a browser's local storage. The task store only
//! talks to this trait, so the medium is chosen by whoever builds the store:
//! - [`MemoryStorage`] keeps everything in process
//! - [`FileStorage`] keeps everything in one JSON file
//! - `BrowserStorage` (feature `web`) uses the browser's local storage

#[cfg(feature = "web")]
mod browser;
mod file;

#[cfg(feature = "web")]
pub use browser::BrowserStorage;
pub use file::FileStorage;

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a storage medium.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on storage file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage file {path} does not hold a string map")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage medium rejected the operation: {0}")]
    Rejected(String),
}

/// A synchronous string key-value medium.
#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Lists every key currently present.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value in a single write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Storage medium held entirely in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, for seeding a medium before handing it to a store.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl Storage for MemoryStorage {
    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
