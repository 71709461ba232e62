//! Async save/load on tokio
//!
//! Same pipeline, events and fallback rules as the blocking calls; only file
//! I/O is awaited. Codec, cipher and preference-store work stays on the
//! calling task.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::SaveOptions;
use crate::error::Result;
use crate::events::{LoadEvent, SaveEvent};
use crate::save_game::{SaveGame, validate_identifier};

impl SaveGame {
    pub async fn save_async<T: Serialize + ?Sized>(
        &self,
        identifier: &str,
        value: &T,
    ) -> Result<()> {
        self.save_with_async(identifier, value, &SaveOptions::default()).await
    }

    pub async fn save_with_async<T: Serialize + ?Sized>(
        &self,
        identifier: &str,
        value: &T,
        options: &SaveOptions,
    ) -> Result<()> {
        validate_identifier(identifier)?;
        let operation = self.operation(identifier, options);
        let converted = serde_json::to_value(value);
        self.events().saving(&SaveEvent {
            operation,
            value: converted.as_ref().ok(),
        });
        let value = converted.map_err(|e| self.save_failed(identifier, e.into()))?;
        let event = SaveEvent {
            operation,
            value: Some(&value),
        };

        let written = match self.encode_record(&operation, &value) {
            Ok(bytes) => match self.location(identifier, operation.base_path) {
                Ok(location) => location.write_async(self.preferences(), &bytes).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        written.map_err(|e| self.save_failed(identifier, e))?;
        self.events().saved(&event);

        log::debug!("Saved '{}' ({})", identifier, operation.codec.name());
        Ok(())
    }

    pub async fn load_async<T: DeserializeOwned + Default>(&self, identifier: &str) -> Result<T> {
        self.load_with_async(identifier, T::default(), &SaveOptions::default())
            .await
    }

    pub async fn load_with_async<T: DeserializeOwned>(
        &self,
        identifier: &str,
        default: T,
        options: &SaveOptions,
    ) -> Result<T> {
        validate_identifier(identifier)?;
        let operation = self.operation(identifier, options);

        self.events().loading(&LoadEvent {
            operation,
            value: None,
        });
        let read = match self.location(identifier, operation.base_path) {
            Ok(location) => location.read_async(self.preferences()).await,
            Err(e) => Err(e),
        };
        let loaded = read
            .and_then(|bytes| {
                bytes
                    .map(|bytes| self.decode_record(&operation, &bytes))
                    .transpose()
            })
            .map_err(|e| self.load_failed(identifier, e))?;
        let result = self.finish_load(&operation, loaded.as_ref(), default)?;
        self.events().loaded(&LoadEvent {
            operation,
            value: loaded.as_ref(),
        });

        Ok(result)
    }

    pub async fn exists_async(&self, identifier: &str) -> Result<bool> {
        validate_identifier(identifier)?;
        self.location(identifier, &self.config().base_path)?
            .exists_async(self.preferences())
            .await
    }

    pub async fn delete_async(&self, identifier: &str) -> Result<()> {
        validate_identifier(identifier)?;
        if self.config().is_ignored(identifier) {
            log::debug!("Not deleting ignored record '{}'", identifier);
            return Ok(());
        }
        self.location(identifier, &self.config().base_path)?
            .remove_async(self.preferences())
            .await
    }
}
