//! Durable client-side key-value storage.
//!
//! Everything the client remembers between runs (cart, theme, language,
//! logged-in user) lives under a fixed key in a [`Storage`] backend. Storage
//! is advisory: a missing or corrupt value resets that piece of state to its
//! default and is never fatal.

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage keys.
pub mod keys {
    /// JSON array of cart line items.
    pub const CART: &str = "cart";

    /// `"true"` or `"false"`.
    pub const DARK_MODE: &str = "darkMode";

    /// JSON record of the logged-in user.
    pub const USER: &str = "user";

    /// Language code of the selected translation.
    pub const LANGUAGE: &str = "selectedLanguage";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Value could not be encoded.
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A string key-value store that survives restarts.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage handle shared by the store, preferences and auth client.
pub type SharedStorage = Arc<dyn Storage>;

/// Read and decode a JSON value, treating every failure as absent.
///
/// Read errors and undecodable payloads are logged at `warn` and yield
/// `None`.
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read from storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring corrupt stored value");
            None
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if encoding fails or the backend cannot be written.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;
    storage.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_missing_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(read_json::<Vec<u32>>(&storage, "nothing"), None);
    }

    #[test]
    fn test_read_json_corrupt_is_none() {
        let storage = MemoryStorage::new();
        storage.set("numbers", "[1, 2,").unwrap();
        assert_eq!(read_json::<Vec<u32>>(&storage, "numbers"), None);
    }

    #[test]
    fn test_write_then_read() {
        let storage = MemoryStorage::new();
        write_json(&storage, "numbers", &[1u32, 2, 3]).unwrap();
        assert_eq!(
            read_json::<Vec<u32>>(&storage, "numbers"),
            Some(vec![1, 2, 3])
        );
    }
}
