use super::{Storage, StorageError};
use gloo_storage::{LocalStorage, Storage as GlooStorage};

/// Storage medium backed by the browser's `window.localStorage`.
///
/// Values are stored as raw strings, not JSON-encoded again, so data written by
/// earlier versions of the web client is read as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }
}

fn rejected(err: impl std::fmt::Debug) -> StorageError {
    StorageError::Rejected(format!("{:?}", err))
}

impl Storage for BrowserStorage {
    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let raw = LocalStorage::raw();
        let length = LocalStorage::length();
        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            if let Some(key) = raw.key(index).map_err(rejected)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw().get_item(key).map_err(rejected)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw().set_item(key, value).map_err(rejected)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        LocalStorage::delete(key);
        Ok(())
    }
}
