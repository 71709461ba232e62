//! Key-value preference stores
//!
//! The store holds raw strings; record bytes are base64-encoded by the caller.
//! - [`MemoryPreferences`]: process-local map
//! - [`FilePreferences`]: one JSON object file, native targets
//! - [`LocalStorage`](super::LocalStorage): browser LocalStorage, wasm32

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, SaveError};

/// String key-value storage
pub trait PreferenceStore: Send + Sync {
    /// Value stored under `key`, `None` if not found
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; missing keys are not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All stored keys
    fn keys(&self) -> Result<Vec<String>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl fmt::Debug for dyn PreferenceStore + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PreferenceStore")
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| SaveError::Preferences("preference store lock poisoned".into()))
}

/// In-memory preference store
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(lock(&self.entries)?.keys().cloned().collect())
    }
}

/// Preference store backed by a single JSON file.
///
/// Every operation re-reads the file, so several stores (or processes) on
/// the same file see each other's writes. Changes are written back before
/// they become visible.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<BTreeMap<String, String>> {
        match super::file::read(&self.path)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SaveError::Preferences(format!(
                    "corrupt preference file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            None => Ok(BTreeMap::new()),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries)?;
        super::file::write(&self.path, &json)
    }

    /// Read the file, apply `f`, and write the result back if `f` changed it
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<()> {
        let _guard = lock(&self.lock)?;
        let mut entries = self.read_file()?;
        if f(&mut entries) {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = lock(&self.lock)?;
        Ok(self.read_file()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let _guard = lock(&self.lock)?;
        Ok(self.read_file()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferences::new();
        assert!(!store.contains("volume").unwrap());
        store.set("volume", "0.8").unwrap();
        store.set("volume", "0.5").unwrap();
        assert_eq!(store.get("volume").unwrap().as_deref(), Some("0.5"));
        store.remove("volume").unwrap();
        store.remove("volume").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prefs/preferences.json");

        let store = FilePreferences::new(&path);
        store.set("quality", "High").unwrap();
        store.set("show_fps", "true").unwrap();
        store.remove("show_fps").unwrap();
        assert!(path.is_file());

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.get("quality").unwrap().as_deref(), Some("High"));
        assert_eq!(reopened.keys().unwrap(), vec!["quality"]);
    }

    #[test]
    fn test_file_stores_share_one_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");
        let first = FilePreferences::new(&path);
        let second = FilePreferences::new(&path);

        first.set("a", "1").unwrap();
        second.set("b", "2").unwrap();
        first.set("c", "3").unwrap();
        assert_eq!(second.keys().unwrap(), vec!["a", "b", "c"]);

        second.set("a", "9").unwrap();
        assert_eq!(first.get("a").unwrap().as_deref(), Some("9"));
        first.remove("b").unwrap();
        assert!(!second.contains("b").unwrap());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");
        std::fs::write(&path, b"not json").unwrap();
        let err = FilePreferences::new(&path).get("x").unwrap_err();
        assert!(matches!(err, SaveError::Preferences(_)));
    }
}
