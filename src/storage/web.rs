//! Browser LocalStorage preference store (wasm32 only)

use web_sys::Storage;

use super::PreferenceStore;
use crate::error::{Result, SaveError};

/// `window.localStorage`, looked up on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| SaveError::Preferences("LocalStorage unavailable".into()))
    }
}

fn js_err(op: &str, key: &str) -> SaveError {
    SaveError::Preferences(format!("LocalStorage {} failed for '{}'", op, key))
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?.get_item(key).map_err(|_| js_err("get", key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| js_err("set", key))
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| js_err("remove", key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let storage = Self::storage()?;
        let len = storage.length().map_err(|_| js_err("length", ""))?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Ok(Some(key)) = storage.key(i) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
