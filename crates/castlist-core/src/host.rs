//! Capabilities the container borrows from its host environment.
//!
//! # Design
//! - Navigation, confirmation prompts and session storage are side effects of
//!   the hosting surface; the container only calls through these traits.
//! - `confirm` blocks until the user answers, like a modal dialog.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use url::Url;

use crate::error::StorageError;

/// Storage key under which the bearer token is persisted.
pub const AUTH_STORAGE_KEY: &str = "auth";

/// Session-scoped key/value storage.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Navigation and dialog capabilities of the hosting surface.
pub trait Host: Send + Sync {
    /// Ask a yes/no question; `true` means the user agreed.
    fn confirm(&self, message: &str) -> bool;

    /// Send the user to another location (login or logout page).
    fn redirect(&self, url: &Url);

    /// Replace the visible location without navigating, dropping the auth fragment.
    fn replace_location(&self, url: &Url);
}

/// In-process storage for hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Storage pre-populated with a token under [`AUTH_STORAGE_KEY`].
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let storage = Self::default();
        storage
            .lock()
            .insert(AUTH_STORAGE_KEY.to_string(), token.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
