//! Storage backends
//!
//! Records go either to files under a base directory or to a key-value
//! preference store. The platform preference store is LocalStorage on the web
//! and a JSON file in the persistent data directory on native targets.

pub mod file;
mod preferences;
#[cfg(target_arch = "wasm32")]
mod web;

pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, SaveError};

/// File name of the native preference store inside the persistent data directory
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Where a single record lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Preference(String),
}

impl Location {
    pub fn read(&self, prefs: &dyn PreferenceStore) -> Result<Option<Vec<u8>>> {
        match self {
            Location::File(path) => file::read(path),
            Location::Preference(key) => prefs.get(key)?.map(|text| decode_text(&text)).transpose(),
        }
    }

    pub fn write(&self, prefs: &dyn PreferenceStore, bytes: &[u8]) -> Result<()> {
        match self {
            Location::File(path) => file::write(path, bytes),
            Location::Preference(key) => prefs.set(key, &encode_text(bytes)),
        }
    }

    pub fn exists(&self, prefs: &dyn PreferenceStore) -> Result<bool> {
        match self {
            Location::File(path) => Ok(file::exists(path)),
            Location::Preference(key) => prefs.contains(key),
        }
    }

    pub fn remove(&self, prefs: &dyn PreferenceStore) -> Result<()> {
        match self {
            Location::File(path) => file::remove(path),
            Location::Preference(key) => prefs.remove(key),
        }
    }
}

#[cfg(feature = "async")]
impl Location {
    pub async fn read_async(&self, prefs: &dyn PreferenceStore) -> Result<Option<Vec<u8>>> {
        match self {
            Location::File(path) => file::nonblocking::read(path).await,
            Location::Preference(_) => self.read(prefs),
        }
    }

    pub async fn write_async(&self, prefs: &dyn PreferenceStore, bytes: &[u8]) -> Result<()> {
        match self {
            Location::File(path) => file::nonblocking::write(path, bytes).await,
            Location::Preference(_) => self.write(prefs, bytes),
        }
    }

    pub async fn exists_async(&self, prefs: &dyn PreferenceStore) -> Result<bool> {
        match self {
            Location::File(path) => file::nonblocking::exists(path).await,
            Location::Preference(_) => self.exists(prefs),
        }
    }

    pub async fn remove_async(&self, prefs: &dyn PreferenceStore) -> Result<()> {
        match self {
            Location::File(path) => file::nonblocking::remove(path).await,
            Location::Preference(_) => self.remove(prefs),
        }
    }
}

pub(crate) fn decode_text(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| SaveError::Preferences(format!("stored value is not base64: {}", e)))
}

pub(crate) fn encode_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Platform preference store for this target
#[cfg(target_arch = "wasm32")]
pub fn platform_preferences(_data_dir: Option<PathBuf>) -> Arc<dyn PreferenceStore> {
    Arc::new(LocalStorage)
}

/// Platform preference store for this target. Falls back to an in-memory
/// store when there is no data directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_preferences(data_dir: Option<PathBuf>) -> Arc<dyn PreferenceStore> {
    match data_dir {
        Some(dir) => Arc::new(FilePreferences::new(dir.join(PREFERENCES_FILE))),
        None => {
            log::warn!("No data directory, preferences will not outlive the process");
            Arc::new(MemoryPreferences::new())
        }
    }
}
