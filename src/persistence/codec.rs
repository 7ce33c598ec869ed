//! Codecs for serialized models.

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{LexisenseError, Result};

/// Turns a serde value into bytes and back.
pub trait ModelCodec: Send + Sync + std::fmt::Debug {
    /// Encode `value`.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a value previously produced by [`encode`](ModelCodec::encode).
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// Get the name of this codec for debugging and logging.
    fn name(&self) -> &'static str;
}

/// Leading bytes of every bincode-encoded model.
pub const BINCODE_MAGIC: [u8; 4] = *b"LXSM";

/// Compact binary encoding, prefixed with [`BINCODE_MAGIC`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl ModelCodec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let mut bytes = BINCODE_MAGIC.to_vec();
        bincode::serde::encode_into_std_write(value, &mut bytes, bincode::config::standard())
            .map_err(|e| LexisenseError::serialization(format!("Failed to encode model: {e}")))?;
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let payload = bytes
            .strip_prefix(BINCODE_MAGIC.as_slice())
            .ok_or_else(|| LexisenseError::serialization("Invalid model magic number"))?;
        let (value, read) =
            bincode::serde::decode_from_slice(payload, bincode::config::standard()).map_err(
                |e| LexisenseError::serialization(format!("Failed to decode model: {e}")),
            )?;
        if read != payload.len() {
            return Err(LexisenseError::serialization(format!(
                "{} trailing bytes after model",
                payload.len() - read
            )));
        }
        Ok(value)
    }

    fn name(&self) -> &'static str {
        "bincode"
    }
}

/// JSON encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty() -> Self {
        Self::new(true)
    }
}

impl ModelCodec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Codec selection by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    #[default]
    Bincode,
    Json,
}

impl ModelFormat {
    /// Format of encoded bytes: bincode models carry [`BINCODE_MAGIC`],
    /// JSON documents start with `{`.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BINCODE_MAGIC) {
            return ModelFormat::Bincode;
        }
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => ModelFormat::Json,
            _ => ModelFormat::Bincode,
        }
    }
}

impl ModelCodec for ModelFormat {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            ModelFormat::Bincode => BincodeCodec.encode(value),
            ModelFormat::Json => JsonCodec::default().encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            ModelFormat::Bincode => BincodeCodec.decode(bytes),
            ModelFormat::Json => JsonCodec::default().decode(bytes),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ModelFormat::Bincode => BincodeCodec.name(),
            ModelFormat::Json => JsonCodec::default().name(),
        }
    }
}
