//! Save/load orchestration
//!
//! [`SaveGame`] ties a codec, a cipher and a storage backend together:
//!
//! ```text
//! save: value -> codec -> (cipher) -> file | preference store
//! load: file | preference store -> (cipher) -> codec -> value
//! ```
//!
//! A missing record loads as the default value. Every other failure is
//! logged (when enabled) and returned with the identifier attached.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cipher::{Cipher, PasswordCipher};
use crate::codec::{self, Codec, JsonCodec};
use crate::config::{SaveConfig, SaveOptions};
use crate::error::{Result, SaveError};
use crate::events::{LoadEvent, Operation, SaveEvent, SaveEvents};
use crate::path::BasePath;
use crate::storage::{self, Location, PreferenceStore, file};

/// Save/load orchestrator
#[derive(Debug)]
pub struct SaveGame {
    config: SaveConfig,
    codec: Arc<dyn Codec>,
    cipher: Arc<dyn Cipher>,
    preferences: Arc<dyn PreferenceStore>,
    events: SaveEvents,
}

impl Default for SaveGame {
    fn default() -> Self {
        Self::new(SaveConfig::default())
    }
}

impl SaveGame {
    /// JSON codec, password cipher and the platform preference store
    pub fn new(config: SaveConfig) -> Self {
        let data_dir = BasePath::PersistentData.resolve(&config.app_name).ok();
        Self {
            codec: Arc::new(JsonCodec::new()),
            cipher: Arc::new(PasswordCipher::new()),
            preferences: storage::platform_preferences(data_dir),
            events: SaveEvents::new(),
            config,
        }
    }

    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn with_cipher(mut self, cipher: impl Cipher + 'static) -> Self {
        self.cipher = Arc::new(cipher);
        self
    }

    pub fn with_preferences(mut self, preferences: impl PreferenceStore + 'static) -> Self {
        self.preferences = Arc::new(preferences);
        self
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SaveConfig {
        &mut self.config
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    pub fn set_codec(&mut self, codec: Arc<dyn Codec>) {
        self.codec = codec;
    }

    pub fn cipher(&self) -> &dyn Cipher {
        self.cipher.as_ref()
    }

    pub fn set_cipher(&mut self, cipher: Arc<dyn Cipher>) {
        self.cipher = cipher;
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    pub fn events(&self) -> &SaveEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut SaveEvents {
        &mut self.events
    }

    // ========================================================================
    // Save / Load
    // ========================================================================

    /// Save `value` under `identifier` with the default settings
    pub fn save<T: Serialize + ?Sized>(&self, identifier: &str, value: &T) -> Result<()> {
        self.save_with(identifier, value, &SaveOptions::default())
    }

    /// Save `value` under `identifier`, overriding defaults with `options`
    pub fn save_with<T: Serialize + ?Sized>(
        &self,
        identifier: &str,
        value: &T,
        options: &SaveOptions,
    ) -> Result<()> {
        validate_identifier(identifier)?;
        let operation = self.operation(identifier, options);
        let converted = serde_json::to_value(value);
        self.events.saving(&SaveEvent {
            operation,
            value: converted.as_ref().ok(),
        });
        let value = converted.map_err(|e| self.save_failed(identifier, e.into()))?;
        let event = SaveEvent {
            operation,
            value: Some(&value),
        };

        self.encode_record(&operation, &value)
            .and_then(|bytes| {
                let location = self.location(identifier, operation.base_path)?;
                location.write(self.preferences(), &bytes)
            })
            .map_err(|e| self.save_failed(identifier, e))?;
        self.events.saved(&event);

        log::debug!("Saved '{}' ({})", identifier, operation.codec.name());
        Ok(())
    }

    /// Load the record under `identifier`, or `T::default()` if there is none
    pub fn load<T: DeserializeOwned + Default>(&self, identifier: &str) -> Result<T> {
        self.load_with(identifier, T::default(), &SaveOptions::default())
    }

    /// Load the record under `identifier`, or `default` if there is none
    pub fn load_or<T: DeserializeOwned>(&self, identifier: &str, default: T) -> Result<T> {
        self.load_with(identifier, default, &SaveOptions::default())
    }

    /// Load with per-call overrides. Only a missing record yields `default`;
    /// decryption and decoding failures are returned.
    pub fn load_with<T: DeserializeOwned>(
        &self,
        identifier: &str,
        default: T,
        options: &SaveOptions,
    ) -> Result<T> {
        validate_identifier(identifier)?;
        let operation = self.operation(identifier, options);

        self.events.loading(&LoadEvent {
            operation,
            value: None,
        });
        let loaded = self
            .location(identifier, operation.base_path)
            .and_then(|location| location.read(self.preferences()))
            .and_then(|bytes| {
                bytes
                    .map(|bytes| self.decode_record(&operation, &bytes))
                    .transpose()
            })
            .map_err(|e| self.load_failed(identifier, e))?;
        let result = self.finish_load(&operation, loaded.as_ref(), default)?;
        self.events.loaded(&LoadEvent {
            operation,
            value: loaded.as_ref(),
        });

        Ok(result)
    }

    // ========================================================================
    // Record management
    // ========================================================================

    /// Whether a record exists under `identifier` in the default base path
    pub fn exists(&self, identifier: &str) -> Result<bool> {
        self.exists_in(identifier, &self.config.base_path)
    }

    pub fn exists_in(&self, identifier: &str, base_path: &BasePath) -> Result<bool> {
        validate_identifier(identifier)?;
        self.location(identifier, base_path)?
            .exists(self.preferences())
    }

    /// Remove the record under `identifier`. Ignored identifiers and missing
    /// records are left alone without error.
    pub fn delete(&self, identifier: &str) -> Result<()> {
        self.delete_in(identifier, &self.config.base_path)
    }

    pub fn delete_in(&self, identifier: &str, base_path: &BasePath) -> Result<()> {
        validate_identifier(identifier)?;
        if self.config.is_ignored(identifier) {
            log::debug!("Not deleting ignored record '{}'", identifier);
            return Ok(());
        }
        self.location(identifier, base_path)?
            .remove(self.preferences())
    }

    /// Remove every record in the default base path (or every preference
    /// key), except ignored files and directories
    pub fn delete_all(&self) -> Result<()> {
        if self.config.use_preferences {
            for key in self.preferences.keys()? {
                if !self.config.is_ignored(&key) {
                    self.preferences.remove(&key)?;
                }
            }
            return Ok(());
        }

        let dir = self.config.base_path.resolve(&self.config.app_name)?;
        for name in file::list(&dir, false)? {
            if !self.config.ignored_files.contains(&name) {
                file::remove(&dir.join(&name))?;
            }
        }
        for name in file::list(&dir, true)? {
            if !self.config.ignored_directories.contains(&name) {
                file::remove_dir(&dir.join(&name))?;
            }
        }
        log::info!(
            "Deleted all records in {} ({})",
            dir.display(),
            self.config.base_path.as_str()
        );
        Ok(())
    }

    /// Copy the record under `from` to `to`, overwriting `to`
    pub fn copy(&self, from: &str, to: &str) -> Result<()> {
        let (source, target) = self.record_pair(from, to)?;
        match (&source, &target) {
            (Location::File(from_path), Location::File(to_path)) => file::copy(from_path, to_path),
            _ => {
                let bytes = self.read_existing(&source, from)?;
                target.write(self.preferences(), &bytes)
            }
        }
    }

    /// Move the record under `from` to `to`, overwriting `to`
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        let (source, target) = self.record_pair(from, to)?;
        match (&source, &target) {
            (Location::File(from_path), Location::File(to_path)) => {
                file::rename(from_path, to_path)
            }
            _ => {
                let bytes = self.read_existing(&source, from)?;
                target.write(self.preferences(), &bytes)?;
                source.remove(self.preferences())
            }
        }
    }

    /// Store bytes as-is, bypassing codec, cipher and events
    pub fn save_raw(&self, identifier: &str, bytes: &[u8]) -> Result<()> {
        validate_identifier(identifier)?;
        self.location(identifier, &self.config.base_path)?
            .write(self.preferences(), bytes)
            .map_err(|e| self.save_failed(identifier, e))
    }

    /// Stored bytes as-is, `None` if there is no record
    pub fn load_raw(&self, identifier: &str) -> Result<Option<Vec<u8>>> {
        validate_identifier(identifier)?;
        self.location(identifier, &self.config.base_path)?
            .read(self.preferences())
            .map_err(|e| self.load_failed(identifier, e))
    }

    // ========================================================================
    // Directories
    // ========================================================================

    /// Names of the files directly inside `directory` (relative to the base
    /// path; empty for the base path itself). A missing directory lists as
    /// empty, see [`exists_dir`](Self::exists_dir).
    pub fn get_files(&self, directory: &str) -> Result<Vec<String>> {
        file::list(&self.directory_path(directory)?, false)
    }

    /// Names of the directories directly inside `directory`
    pub fn get_directories(&self, directory: &str) -> Result<Vec<String>> {
        file::list(&self.directory_path(directory)?, true)
    }

    pub fn exists_dir(&self, directory: &str) -> Result<bool> {
        Ok(self.directory_path(directory)?.is_dir())
    }

    fn directory_path(&self, directory: &str) -> Result<PathBuf> {
        let base = &self.config.base_path;
        if directory.is_empty() {
            base.resolve(&self.config.app_name)
        } else {
            base.record_path(&self.config.app_name, directory)
        }
    }

    // ========================================================================
    // Pipeline pieces shared with the async variants
    // ========================================================================

    pub(crate) fn operation<'a>(
        &'a self,
        identifier: &'a str,
        options: &'a SaveOptions,
    ) -> Operation<'a> {
        Operation {
            identifier,
            encrypt: options.encrypt.unwrap_or(self.config.encrypt),
            password: options.password.as_deref().unwrap_or(&self.config.password),
            codec: options.codec.as_deref().unwrap_or(self.codec.as_ref()),
            cipher: options.cipher.as_deref().unwrap_or(self.cipher.as_ref()),
            encoding: options.encoding.unwrap_or(self.config.encoding),
            base_path: options.base_path.as_ref().unwrap_or(&self.config.base_path),
            use_preferences: self.config.use_preferences,
        }
    }

    pub(crate) fn location(&self, identifier: &str, base_path: &BasePath) -> Result<Location> {
        if self.config.use_preferences {
            return Ok(Location::Preference(identifier.to_string()));
        }
        Ok(Location::File(
            base_path.record_path(&self.config.app_name, identifier)?,
        ))
    }

    /// Serialize, then encrypt if requested
    pub(crate) fn encode_record(
        &self,
        operation: &Operation<'_>,
        value: &Value,
    ) -> Result<Vec<u8>> {
        let bytes = codec::to_bytes(operation.codec, value, operation.encoding)?;
        if operation.encrypt {
            operation.cipher.encode(&bytes, operation.password)
        } else {
            Ok(bytes)
        }
    }

    /// Decrypt if requested, then deserialize
    pub(crate) fn decode_record(&self, operation: &Operation<'_>, bytes: &[u8]) -> Result<Value> {
        if operation.encrypt {
            let plain = operation.cipher.decode(bytes, operation.password)?;
            codec::from_bytes(operation.codec, &plain, operation.encoding)
        } else {
            codec::from_bytes(operation.codec, bytes, operation.encoding)
        }
    }

    /// Convert a loaded value into `T`, or fall back to `default`
    pub(crate) fn finish_load<T: DeserializeOwned>(
        &self,
        operation: &Operation<'_>,
        loaded: Option<&Value>,
        default: T,
    ) -> Result<T> {
        match loaded {
            Some(value) => T::deserialize(value)
                .map_err(|e| self.load_failed(operation.identifier, e.into())),
            None => {
                log::debug!("No record '{}', using default", operation.identifier);
                Ok(default)
            }
        }
    }

    pub(crate) fn save_failed(&self, identifier: &str, err: SaveError) -> SaveError {
        let err = SaveError::saving(identifier, err);
        if self.config.log_errors {
            log::error!("{}", err);
        }
        err
    }

    pub(crate) fn load_failed(&self, identifier: &str, err: SaveError) -> SaveError {
        let err = SaveError::loading(identifier, err);
        if self.config.log_errors {
            log::error!("{}", err);
        }
        err
    }

    fn record_pair(&self, from: &str, to: &str) -> Result<(Location, Location)> {
        validate_identifier(from)?;
        validate_identifier(to)?;
        let base = &self.config.base_path;
        Ok((self.location(from, base)?, self.location(to, base)?))
    }

    fn read_existing(&self, location: &Location, identifier: &str) -> Result<Vec<u8>> {
        location.read(self.preferences())?.ok_or_else(|| {
            SaveError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no record '{}'", identifier),
            ))
        })
    }
}

pub(crate) fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        return Err(SaveError::InvalidArgument("identifier"));
    }
    Ok(())
}
