//! Shared bincode configuration for everything that crosses the wire.

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize with fixed-width integers, little endian.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, String> {
    bincode::serialize(value).map_err(|e| e.to_string())
}

/// Deserialize, reading at most `limit` bytes and rejecting trailing data.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8], limit: usize) -> Result<T, String> {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(limit as u64)
        .reject_trailing_bytes()
        .deserialize(bytes)
        .map_err(|e| e.to_string())
}
