//! BLAKE3 hashing and context-separated derivation.

/// BLAKE3 hash output (32 bytes).
pub type HashOutput = [u8; 32];

/// Compute BLAKE3 hash of input data.
#[must_use]
pub fn hash(data: &[u8]) -> HashOutput {
    *blake3::hash(data).as_bytes()
}

/// Derive a 32-byte value bound to `context`.
///
/// Two different contexts never produce the same output for the same
/// input, so identifiers derived here cannot collide with hashes used
/// elsewhere in the protocol.
#[must_use]
pub fn derive(context: &str, material: &[u8]) -> HashOutput {
    blake3::derive_key(context, material)
}
