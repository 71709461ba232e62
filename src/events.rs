//! Save/load event hooks
//!
//! Every save runs `on_saving` handlers, then the save callback, then
//! `on_saved` handlers. Loads do the same with `on_loading`, the load
//! callback and `on_loaded`. Handlers run synchronously in subscription
//! order. Nothing after the pre-event runs when the operation fails.

use serde_json::Value;

use crate::cipher::Cipher;
use crate::codec::{Codec, TextEncoding};
use crate::path::BasePath;

/// Fully resolved parameters of one save or load
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    pub identifier: &'a str,
    pub encrypt: bool,
    pub password: &'a str,
    pub codec: &'a dyn Codec,
    pub cipher: &'a dyn Cipher,
    pub encoding: TextEncoding,
    pub base_path: &'a BasePath,
    pub use_preferences: bool,
}

/// Passed to save handlers
#[derive(Debug, Clone, Copy)]
pub struct SaveEvent<'a> {
    pub operation: Operation<'a>,
    /// The value being saved, in codec form. `None` when the value could
    /// not be converted; the save then fails after the pre-save handlers.
    pub value: Option<&'a Value>,
}

/// Passed to load handlers
#[derive(Debug, Clone, Copy)]
pub struct LoadEvent<'a> {
    pub operation: Operation<'a>,
    /// The loaded value in codec form. `None` before loading and when the
    /// record did not exist.
    pub value: Option<&'a Value>,
}

pub type SaveHandler = Box<dyn Fn(&SaveEvent<'_>) + Send + Sync>;
pub type LoadHandler = Box<dyn Fn(&LoadEvent<'_>) + Send + Sync>;

/// Handle returned by subscriptions, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Event subscriptions and callbacks
#[derive(Default)]
pub struct SaveEvents {
    on_saving: Vec<(SubscriptionId, SaveHandler)>,
    on_saved: Vec<(SubscriptionId, SaveHandler)>,
    on_loading: Vec<(SubscriptionId, LoadHandler)>,
    on_loaded: Vec<(SubscriptionId, LoadHandler)>,
    save_callback: Option<SaveHandler>,
    load_callback: Option<LoadHandler>,
    next_id: u64,
}

impl SaveEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Occurs when saving starts
    pub fn on_saving(
        &mut self,
        handler: impl Fn(&SaveEvent<'_>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.on_saving.push((id, Box::new(handler)));
        id
    }

    /// Occurs when saving finished
    pub fn on_saved(
        &mut self,
        handler: impl Fn(&SaveEvent<'_>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.on_saved.push((id, Box::new(handler)));
        id
    }

    /// Occurs when loading starts
    pub fn on_loading(
        &mut self,
        handler: impl Fn(&LoadEvent<'_>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.on_loading.push((id, Box::new(handler)));
        id
    }

    /// Occurs when loading finished
    pub fn on_loaded(
        &mut self,
        handler: impl Fn(&LoadEvent<'_>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.on_loaded.push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.len();
        self.on_saving.retain(|(sub, _)| *sub != id);
        self.on_saved.retain(|(sub, _)| *sub != id);
        self.on_loading.retain(|(sub, _)| *sub != id);
        self.on_loaded.retain(|(sub, _)| *sub != id);
        self.len() != before
    }

    /// Replace the save callback
    pub fn set_save_callback(&mut self, callback: impl Fn(&SaveEvent<'_>) + Send + Sync + 'static) {
        self.save_callback = Some(Box::new(callback));
    }

    /// Replace the load callback
    pub fn set_load_callback(&mut self, callback: impl Fn(&LoadEvent<'_>) + Send + Sync + 'static) {
        self.load_callback = Some(Box::new(callback));
    }

    pub fn clear_save_callback(&mut self) -> Option<SaveHandler> {
        self.save_callback.take()
    }

    pub fn clear_load_callback(&mut self) -> Option<LoadHandler> {
        self.load_callback.take()
    }

    /// Number of subscriptions, callbacks excluded
    pub fn len(&self) -> usize {
        self.on_saving.len() + self.on_saved.len() + self.on_loading.len() + self.on_loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn saving(&self, event: &SaveEvent<'_>) {
        self.on_saving.iter().for_each(|(_, handler)| handler(event));
    }

    /// Save callback, then `on_saved` handlers
    pub(crate) fn saved(&self, event: &SaveEvent<'_>) {
        if let Some(callback) = &self.save_callback {
            callback(event);
        }
        self.on_saved.iter().for_each(|(_, handler)| handler(event));
    }

    pub(crate) fn loading(&self, event: &LoadEvent<'_>) {
        self.on_loading.iter().for_each(|(_, handler)| handler(event));
    }

    /// Load callback, then `on_loaded` handlers
    pub(crate) fn loaded(&self, event: &LoadEvent<'_>) {
        if let Some(callback) = &self.load_callback {
            callback(event);
        }
        self.on_loaded.iter().for_each(|(_, handler)| handler(event));
    }
}

impl std::fmt::Debug for SaveEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveEvents")
            .field("on_saving", &self.on_saving.len())
            .field("on_saved", &self.on_saved.len())
            .field("on_loading", &self.on_loading.len())
            .field("on_loaded", &self.on_loaded.len())
            .field("save_callback", &self.save_callback.is_some())
            .field("load_callback", &self.load_callback.is_some())
            .finish()
    }
}
