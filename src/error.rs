//! Error types for save/load operations

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("invalid argument `{0}`: must not be empty")]
    InvalidArgument(&'static str),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("preference store error: {0}")]
    Preferences(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to save data with identifier '{identifier}': {source}")]
    Save {
        identifier: String,
        #[source]
        source: Box<SaveError>,
    },

    #[error("failed to load data with identifier '{identifier}': {source}")]
    Load {
        identifier: String,
        #[source]
        source: Box<SaveError>,
    },
}

impl SaveError {
    /// The innermost error, looking through identifier context.
    pub fn root(&self) -> &SaveError {
        match self {
            SaveError::Save { source, .. } | SaveError::Load { source, .. } => source.root(),
            other => other,
        }
    }

    /// Wrong password or corrupted ciphertext
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self.root(), SaveError::Decryption(_))
    }

    pub fn is_serialization_failure(&self) -> bool {
        matches!(self.root(), SaveError::Serialization(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.root(), SaveError::InvalidArgument(_))
    }

    pub(crate) fn saving(identifier: &str, source: SaveError) -> Self {
        SaveError::Save {
            identifier: identifier.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn loading(identifier: &str, source: SaveError) -> Self {
        SaveError::Load {
            identifier: identifier.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        SaveError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_looks_through_context() {
        let err = SaveError::loading("slot1.sav", SaveError::Decryption("bad tag".into()));
        assert!(err.is_decryption_failure());
        assert!(!err.is_serialization_failure());
        assert_eq!(
            err.to_string(),
            "failed to load data with identifier 'slot1.sav': decryption failed: bad tag"
        );
    }

    #[test]
    fn test_invalid_argument_names_parameter() {
        let err = SaveError::InvalidArgument("identifier");
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("identifier"));
    }
}
