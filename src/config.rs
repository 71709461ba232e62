//! Save/load configuration
//!
//! [`SaveConfig`] holds the defaults every operation falls back to.
//! [`SaveOptions`] overrides them for a single call.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cipher::Cipher;
use crate::codec::{Codec, TextEncoding};
use crate::path::BasePath;
use crate::storage::PREFERENCES_FILE;

/// Files that live next to saves and must survive `delete` / `delete_all`
pub const DEFAULT_IGNORED_FILES: &[&str] = &["Player.log", "output_log.txt", PREFERENCES_FILE];

/// Directories `delete_all` leaves alone
pub const DEFAULT_IGNORED_DIRECTORIES: &[&str] = &["Analytics"];

/// Process defaults for save/load operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Application name, the last component of the persistent data directory
    pub app_name: String,

    // === Encryption ===
    /// Encrypt records by default
    pub encrypt: bool,
    /// Default encryption password
    pub password: String,

    // === Format ===
    /// Text encoding for text codecs
    pub encoding: TextEncoding,

    // === Storage ===
    /// Base directory for file records
    pub base_path: BasePath,
    /// Route records through the preference store instead of files
    pub use_preferences: bool,

    // === Diagnostics ===
    /// Log failures before returning them
    pub log_errors: bool,

    // === Protection ===
    /// File names `delete` and `delete_all` never remove
    pub ignored_files: BTreeSet<String>,
    /// Directory names `delete_all` never removes
    pub ignored_directories: BTreeSet<String>,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),

            encrypt: false,
            password: String::new(),

            encoding: TextEncoding::default(),

            base_path: BasePath::PersistentData,
            use_preferences: false,

            log_errors: true,

            ignored_files: DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
            ignored_directories: DEFAULT_IGNORED_DIRECTORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SaveConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    pub fn with_base_path(mut self, base_path: BasePath) -> Self {
        self.base_path = base_path;
        self
    }

    /// Encrypt by default with `password`
    pub fn with_encryption(mut self, password: impl Into<String>) -> Self {
        self.encrypt = true;
        self.password = password.into();
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_preferences(mut self, use_preferences: bool) -> Self {
        self.use_preferences = use_preferences;
        self
    }

    pub fn with_log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }

    /// Protect a file name (or identifier) from deletion
    pub fn ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignored_files.insert(name.into());
        self
    }

    pub fn ignore_directory(mut self, name: impl Into<String>) -> Self {
        self.ignored_directories.insert(name.into());
        self
    }

    /// Whether `identifier` is protected from deletion. Matches the whole
    /// identifier or its final path component.
    pub fn is_ignored(&self, identifier: &str) -> bool {
        if self.ignored_files.contains(identifier) {
            return true;
        }
        std::path::Path::new(identifier)
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.ignored_files.contains(name))
    }
}

/// Per-call overrides; `None` falls back to the [`SaveGame`](crate::SaveGame) defaults
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    pub encrypt: Option<bool>,
    pub password: Option<String>,
    pub codec: Option<Arc<dyn Codec>>,
    pub cipher: Option<Arc<dyn Cipher>>,
    pub encoding: Option<TextEncoding>,
    pub base_path: Option<BasePath>,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = Some(encrypt);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Shorthand for `encrypt(true).password(password)`
    pub fn encrypted(self, password: impl Into<String>) -> Self {
        self.encrypt(true).password(password)
    }

    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    pub fn cipher(mut self, cipher: impl Cipher + 'static) -> Self {
        self.cipher = Some(Arc::new(cipher));
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn base_path(mut self, base_path: BasePath) -> Self {
        self.base_path = Some(base_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SaveConfig::default();
        assert!(!config.encrypt);
        assert!(config.password.is_empty());
        assert_eq!(config.encoding, TextEncoding::utf8());
        assert_eq!(config.base_path, BasePath::PersistentData);
        assert!(!config.use_preferences);
        assert!(config.log_errors);
        assert!(config.ignored_files.contains("Player.log"));
        assert!(config.ignored_directories.contains("Analytics"));
    }

    #[test]
    fn test_is_ignored_matches_file_name() {
        let config = SaveConfig::default().ignore_file("keep.sav");
        assert!(config.is_ignored("keep.sav"));
        assert!(config.is_ignored("logs/Player.log"));
        assert!(config.is_ignored("output_log.txt"));
        assert!(!config.is_ignored("slot1.sav"));
    }

    #[test]
    fn test_config_serde_fills_missing_fields() {
        let config: SaveConfig =
            serde_json::from_str(r#"{ "app_name": "roto", "encrypt": true }"#).unwrap();
        assert_eq!(config.app_name, "roto");
        assert!(config.encrypt);
        assert!(config.log_errors);

        let json = serde_json::to_string(&config).unwrap();
        let back: SaveConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_options_builders() {
        let options = SaveOptions::new().encrypted("pw").base_path(BasePath::Install);
        assert_eq!(options.encrypt, Some(true));
        assert_eq!(options.password.as_deref(), Some("pw"));
        assert_eq!(options.base_path, Some(BasePath::Install));
        assert!(options.codec.is_none());
    }
}
