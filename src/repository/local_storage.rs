//! `localStorage` backend

use super::{KeyValueStore, StoreError, StoreResult};
use crate::browser::js_error_text;

/// [`KeyValueStore`] over `window.localStorage`.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn open() -> StoreResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(js_error_text(&e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Backend(js_error_text(&e)))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(js_error_text(&e)))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Backend(js_error_text(&e)))
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let len = self
            .storage
            .length()
            .map_err(|e| StoreError::Backend(js_error_text(&e)))?;

        let mut keys = Vec::with_capacity(len as usize);
        for index in 0..len {
            if let Some(key) = self
                .storage
                .key(index)
                .map_err(|e| StoreError::Backend(js_error_text(&e)))?
            {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
