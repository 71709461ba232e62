//! Serialization codecs
//!
//! A codec turns a value into record bytes and back. Values cross the codec
//! boundary as a self-describing [`serde_json::Value`], which keeps the trait
//! object-safe so codecs can be swapped at runtime:
//! - [`JsonCodec`]: UTF-8 (or any writable `encoding_rs` encoding) JSON text
//! - [`MsgPackCodec`]: compact MessagePack, ignores the text encoding

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;

use std::fmt;
use std::io::{Read, Write};

use encoding_rs::Encoding;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Result, SaveError};

/// Serializer/deserializer pair for record payloads
pub trait Codec: Send + Sync {
    /// Write `value` to `out`
    fn serialize(&self, value: &Value, out: &mut dyn Write, encoding: TextEncoding) -> Result<()>;

    /// Read one value from `input`
    fn deserialize(&self, input: &mut dyn Read, encoding: TextEncoding) -> Result<Value>;

    /// Codec name, reported to event handlers
    fn name(&self) -> &str;
}

impl fmt::Debug for dyn Codec + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codec({})", self.name())
    }
}

/// Serialize into an in-memory buffer
pub fn to_bytes(codec: &dyn Codec, value: &Value, encoding: TextEncoding) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    codec.serialize(value, &mut buf, encoding)?;
    Ok(buf)
}

/// Deserialize from an in-memory buffer
pub fn from_bytes(codec: &dyn Codec, bytes: &[u8], encoding: TextEncoding) -> Result<Value> {
    let mut input = bytes;
    codec.deserialize(&mut input, encoding)
}

/// Text encoding used by text codecs
///
/// Only encodings `encoding_rs` can write are accepted, so UTF-16 labels are
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    pub fn utf8() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }

    /// Look up an encoding by WHATWG label (`"utf-8"`, `"latin1"`, `"shift_jis"`, ...)
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| SaveError::Config(format!("unknown text encoding '{}'", label)))?;
        if encoding.output_encoding() != encoding {
            return Err(SaveError::Config(format!(
                "text encoding '{}' cannot be used for writing",
                encoding.name()
            )));
        }
        Ok(TextEncoding(encoding))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Encode text, failing on characters the encoding cannot represent
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_errors) = self.0.encode(text);
        if had_errors {
            return Err(SaveError::Serialization(format!(
                "text contains characters not representable in {}",
                self.name()
            )));
        }
        Ok(bytes.into_owned())
    }

    /// Decode text, failing on malformed input
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.0
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| SaveError::Serialization(format!("malformed {} text", self.name())))
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl Serialize for TextEncoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TextEncoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        TextEncoding::for_label(&label).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(TextEncoding::default().name(), "UTF-8");
    }

    #[test]
    fn test_for_label() {
        assert_eq!(TextEncoding::for_label("latin1").unwrap().name(), "windows-1252");
        assert!(TextEncoding::for_label("no-such-encoding").is_err());
        assert!(TextEncoding::for_label("utf-16le").is_err());
    }

    #[test]
    fn test_unmappable_text_is_an_error() {
        let latin1 = TextEncoding::for_label("latin1").unwrap();
        assert_eq!(latin1.encode("café").unwrap(), b"caf\xe9");
        assert!(latin1.encode("日本").unwrap_err().to_string().contains("windows-1252"));
    }

    #[test]
    fn test_malformed_utf8_is_an_error() {
        assert!(TextEncoding::utf8().decode(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_serde_as_label() {
        let json = serde_json::to_string(&TextEncoding::utf8()).unwrap();
        assert_eq!(json, "\"UTF-8\"");
        let back: TextEncoding = serde_json::from_str("\"shift_jis\"").unwrap();
        assert_eq!(back.name(), "Shift_JIS");
    }
}
