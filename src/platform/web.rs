//! Browser glue: LocalStorage and name entry

use crate::persistence::{KeyValueStore, StorageError};

/// `window.localStorage` as a key-value store
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, high scores will not persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::Rejected {
                key: key.to_string(),
            })
    }
}

/// Ask the player for a name. `None` when the dialog is cancelled.
pub fn prompt_name(message: &str) -> Option<String> {
    web_sys::window()?.prompt_with_message(message).ok().flatten()
}
