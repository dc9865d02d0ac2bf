//! Payload codecs used by the resolver.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Encoding or decoding failure inside a codec.
#[derive(Debug, Error)]
#[error("{codec}: {message}")]
pub struct CodecError {
    /// Codec that failed
    pub codec: &'static str,
    /// Underlying error message
    pub message: String,
}

impl CodecError {
    fn new(codec: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            codec,
            message: err.to_string(),
        }
    }
}

/// Converts values of type `T` to and from cached bytes.
///
/// Implementations must be lossless: `decode(encode(v)) == v` for every value
/// a fetch can produce.
pub trait Codec<T>: Send + Sync {
    /// Serializes a value.
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Deserializes a value.
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec (serde_json). The default.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::new("json", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::new("json", e))
    }
}

/// Compact binary codec (bincode).
///
/// Only suitable for types that do not rely on self-describing formats
/// (no `serde_json::Value`, no untagged enums).
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for BincodeCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::new("bincode", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::new("bincode", e))
    }
}
