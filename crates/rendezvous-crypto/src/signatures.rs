//! Ed25519 signatures and the signing capabilities used by the record codec.
//!
//! The peer-record codec never talks to `ed25519-dalek` directly. It is
//! written against two small capability traits:
//!
//! - [`Signer`]: holds a private key, exposes its public key and signs bytes
//! - [`SignatureVerifier`]: checks a signature against raw public key bytes
//!
//! [`SigningKey`] and [`Ed25519Verifier`] are the production implementations.
//! Tests can substitute deterministic fakes.
//!
//! ## Usage
//!
//! ```
//! use rendezvous_crypto::signatures::{Ed25519Verifier, SignatureVerifier, Signer, SigningKey};
//! use rand_core::OsRng;
//!
//! let signing_key = SigningKey::generate(&mut OsRng);
//! let message = b"authenticate this message";
//! let signature = signing_key.try_sign(message).unwrap();
//!
//! let public_key = signing_key.public_key();
//! assert!(Ed25519Verifier.verify(&public_key, message, &signature).is_ok());
//! ```

use crate::CryptoError;
use ed25519_dalek::Signer as _;
use ed25519_dalek::Verifier as _;
use rand_core::{CryptoRng, RngCore};
use zeroize::ZeroizeOnDrop;

/// Ed25519 public key size
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Ed25519 secret key size
pub const SECRET_KEY_SIZE: usize = 32;

/// Ed25519 signature size
pub const SIGNATURE_SIZE: usize = 64;

/// Something that can sign on behalf of a peer identity.
pub trait Signer {
    /// Raw public key bytes embedded in produced envelopes.
    fn public_key(&self) -> Vec<u8>;

    /// Sign `message`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SigningFailed`] if the backend cannot sign.
    fn try_sign(&self, message: &[u8]) -> Result<Signature, CryptoError>;
}

/// Something that can check a signature against raw public key bytes.
pub trait SignatureVerifier {
    /// Verify `signature` over `message` under `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidPublicKey`] if the key bytes cannot be
    /// parsed and [`CryptoError::InvalidSignature`] if verification fails.
    fn verify(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &Signature,
    ) -> Result<(), CryptoError>;
}

/// Ed25519 signature (64 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    /// Create a signature from raw bytes
    #[must_use]
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a signature from a slice
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignature`] if the slice is not exactly 64 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SIGNATURE_SIZE] = slice
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self(bytes))
    }

    /// Get the raw signature bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    fn to_dalek(self) -> ed25519_dalek::Signature {
        ed25519_dalek::Signature::from_bytes(&self.0)
    }
}

/// Ed25519 signing key (private key)
///
/// Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

impl SigningKey {
    /// Generate a new random signing key
    #[must_use]
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(rng),
        }
    }

    /// Create from raw 32-byte seed
    #[must_use]
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(bytes),
        }
    }

    /// Create from a seed slice, as read from a key file
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: &[u8; SECRET_KEY_SIZE] =
            slice
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: SECRET_KEY_SIZE,
                    actual: slice.len(),
                })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Sign a message
    ///
    /// Signing is deterministic - the same message will always produce
    /// the same signature with the same key.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.inner.sign(message).to_bytes())
    }

    /// Get the corresponding verifying key (public key)
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Export signing key bytes
    ///
    /// # Security
    ///
    /// This exposes the raw secret key bytes. Callers must zeroize the
    /// returned array once it has been persisted.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.inner.to_bytes()
    }
}

impl Signer for SigningKey {
    fn public_key(&self) -> Vec<u8> {
        self.verifying_key().to_bytes().to_vec()
    }

    fn try_sign(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        self.inner
            .try_sign(message)
            .map(|sig| Signature(sig.to_bytes()))
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))
    }
}

/// Ed25519 verifying key (public key)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl VerifyingKey {
    /// Create from raw 32-byte public key
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidPublicKey`] if the bytes do not
    /// represent a valid Ed25519 public key point.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self, CryptoError> {
        let inner = ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { inner })
    }

    /// Create from a public key slice of any length
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidPublicKey`] if the slice has the wrong
    /// length or is not a valid curve point.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: &[u8; PUBLIC_KEY_SIZE] =
            slice.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(bytes)
    }

    /// Get the raw public key bytes
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.inner.to_bytes()
    }

    /// Verify a signature on a message
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignature`] if the signature is invalid,
    /// malformed, or does not authenticate the message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        self.inner
            .verify(message, &signature.to_dalek())
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

/// Stateless Ed25519 [`SignatureVerifier`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &Signature,
    ) -> Result<(), CryptoError> {
        VerifyingKey::from_slice(public_key)?.verify(message, signature)
    }
}
