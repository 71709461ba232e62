use std::io::{Read, Write};

use serde_json::Value;

use super::{Codec, TextEncoding};
use crate::error::{Result, SaveError};

/// MessagePack codec (binary, compact). The text encoding is not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    fn serialize(&self, value: &Value, out: &mut dyn Write, _encoding: TextEncoding) -> Result<()> {
        let bytes = rmp_serde::to_vec(value).map_err(|e| SaveError::Serialization(e.to_string()))?;
        out.write_all(&bytes)?;
        Ok(())
    }

    fn deserialize(&self, input: &mut dyn Read, _encoding: TextEncoding) -> Result<Value> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        rmp_serde::from_slice(&bytes).map_err(|e| SaveError::Serialization(e.to_string()))
    }

    fn name(&self) -> &str {
        "msgpack"
    }
}
