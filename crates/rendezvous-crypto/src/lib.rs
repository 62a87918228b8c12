//! # Rendezvous Crypto
//!
//! Cryptographic primitives for the rendezvous protocol.
//!
//! This crate provides:
//! - Ed25519 signing and verifying keys
//! - The [`signatures::Signer`] and [`signatures::SignatureVerifier`]
//!   capability traits the peer-record codec is written against
//! - BLAKE3 hashing and context-separated derivation
//!
//! ## Cryptographic Suite
//!
//! | Function | Algorithm | Security Level |
//! |----------|-----------|----------------|
//! | Signatures | Ed25519 | 128-bit |
//! | Identity derivation | BLAKE3 (derive_key) | 128-bit collision |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hash;
pub mod signatures;

pub use error::CryptoError;
pub use signatures::{Ed25519Verifier, Signature, SignatureVerifier, Signer, SigningKey, VerifyingKey};
