//! savegame - local save/load persistence
//!
//! Core modules:
//! - `save_game`: Save/load orchestration (codec → cipher → backend)
//! - `codec`: Pluggable serialization (JSON, MessagePack)
//! - `cipher`: Password-based encryption
//! - `storage`: File and preference-store backends
//! - `events`: Pre/post save and load hooks
//! - `config`: Defaults and per-call overrides
//!
//! ```no_run
//! use savegame::{BasePath, SaveConfig, SaveGame, SaveOptions};
//!
//! # fn main() -> savegame::Result<()> {
//! let config = SaveConfig::new("roto-pong").with_base_path(BasePath::PersistentData);
//! let save_game = SaveGame::new(config);
//! save_game.save("highscores.sav", &vec![4500u64, 3200, 900])?;
//! let scores: Vec<u64> = save_game.load("highscores.sav")?;
//!
//! let secret = SaveOptions::new().encrypted("hunter2");
//! save_game.save_with("profile.sav", "player one", &secret)?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "async")]
mod async_ops;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod path;
pub mod save_game;
pub mod storage;

pub use cipher::{Cipher, PasswordCipher};
pub use codec::{Codec, JsonCodec, MsgPackCodec, TextEncoding};
pub use config::{SaveConfig, SaveOptions};
pub use error::{Result, SaveError};
pub use events::{LoadEvent, Operation, SaveEvent, SaveEvents, SubscriptionId};
pub use path::{BasePath, is_file_path};
pub use save_game::SaveGame;
pub use storage::{FilePreferences, MemoryPreferences, PreferenceStore};
