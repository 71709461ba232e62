use std::io::{Read, Write};

use serde_json::Value;

use super::{Codec, TextEncoding};
use crate::error::Result;

/// JSON codec (human-readable, larger size)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn serialize(&self, value: &Value, out: &mut dyn Write, encoding: TextEncoding) -> Result<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        out.write_all(&encoding.encode(&text)?)?;
        Ok(())
    }

    fn deserialize(&self, input: &mut dyn Read, encoding: TextEncoding) -> Result<Value> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let text = encoding.decode(&bytes)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn name(&self) -> &str {
        "json"
    }
}
