//! Signed peer records.
//!
//! A peer announces itself by sealing a [`PeerRecord`] into an [`Envelope`]:
//! the record is serialized, and the serialized bytes are signed together
//! with a fixed domain string and payload type. Anyone holding the envelope
//! can check that the record was produced by the holder of the embedded
//! public key before trusting the addresses inside.
//!
//! ```
//! use rendezvous_crypto::SigningKey;
//! use rendezvous_proto::clock::FixedClock;
//! use rendezvous_proto::peer::PeerId;
//! use rendezvous_proto::record::{seal, unseal};
//! use rendezvous_crypto::Signer;
//!
//! let key = SigningKey::from_bytes(&[7u8; 32]);
//! let id = PeerId::from_public_key(&key.public_key());
//! let addrs = vec!["/ip4/10.0.0.1/tcp/60000".parse().unwrap()];
//!
//! let bytes = seal(&key, &FixedClock(1), &id, &addrs).unwrap();
//! let info = unseal(&bytes).unwrap();
//! assert_eq!(info.id, id);
//! assert_eq!(info.addrs, addrs);
//! ```

use crate::clock::Clock;
use crate::error::CodecError;
use crate::peer::{AddrInfo, Multiaddr, PeerId};
use crate::wire;
use rendezvous_crypto::{CryptoError, Ed25519Verifier, Signature, SignatureVerifier, Signer};
use serde::{Deserialize, Serialize};

/// Domain string mixed into every peer-record signature.
pub const PEER_RECORD_ENVELOPE_DOMAIN: &str = "libp2p-peer-record";

/// Payload type identifying a serialized [`PeerRecord`].
pub const PEER_RECORD_PAYLOAD_TYPE: &[u8] = &[0x03, 0x01];

/// Largest envelope accepted by the parser.
pub const MAX_ENVELOPE_SIZE: usize = 64 * 1024;

/// Identity, addresses and freshness of a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    /// Peer identity
    pub peer_id: PeerId,
    /// Reachable addresses
    pub addrs: Vec<Multiaddr>,
    /// Higher values supersede lower ones
    pub seq: u64,
}

impl PeerRecord {
    /// Build a record stamped with the current time as sequence number.
    #[must_use]
    pub fn new<C: Clock + ?Sized>(peer_id: PeerId, addrs: Vec<Multiaddr>, clock: &C) -> Self {
        Self {
            peer_id,
            addrs,
            seq: clock.now_unix_secs(),
        }
    }

    /// Serialize the record payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialization`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        wire::encode(self).map_err(CodecError::Serialization)
    }

    /// Parse a record payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WrongRecordType`] if the bytes are not a peer record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        wire::decode(bytes, MAX_ENVELOPE_SIZE).map_err(|_| CodecError::WrongRecordType)
    }

    /// Identity and addresses without the sequence number.
    #[must_use]
    pub fn addr_info(&self) -> AddrInfo {
        AddrInfo::new(self.peer_id, self.addrs.clone())
    }
}

/// Signed container for a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Signer's public key
    pub public_key: Vec<u8>,
    /// What the payload holds
    pub payload_type: Vec<u8>,
    /// Serialized record
    pub payload: Vec<u8>,
    /// Signature over domain, payload type and payload
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Sign `payload` under `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Signing`] if the signer fails.
    pub fn seal<S: Signer + ?Sized>(
        signer: &S,
        domain: &str,
        payload_type: &[u8],
        payload: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let unsigned = signing_bytes(domain, payload_type, &payload);
        let signature = signer
            .try_sign(&unsigned)
            .map_err(|e| CodecError::Signing(e.to_string()))?;

        Ok(Self {
            public_key: signer.public_key(),
            payload_type: payload_type.to_vec(),
            payload,
            signature: signature.as_bytes().to_vec(),
        })
    }

    /// Verify the signature under `domain` and return the payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SignatureInvalid`] if the signature, or the key
    /// it is checked against, is not valid.
    pub fn open<V: SignatureVerifier + ?Sized>(
        &self,
        verifier: &V,
        domain: &str,
    ) -> Result<&[u8], CodecError> {
        let signature =
            Signature::from_slice(&self.signature).map_err(|_| CodecError::SignatureInvalid)?;
        let unsigned = signing_bytes(domain, &self.payload_type, &self.payload);

        verifier
            .verify(&self.public_key, &unsigned, &signature)
            .map_err(|e| match e {
                CryptoError::InvalidPublicKey | CryptoError::InvalidSignature => {
                    CodecError::SignatureInvalid
                }
                other => CodecError::MalformedEnvelope(other.to_string()),
            })?;

        Ok(&self.payload)
    }

    /// Serialize the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialization`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        wire::encode(self).map_err(CodecError::Serialization)
    }

    /// Structural parse; the signature is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedEnvelope`] if the bytes are oversized
    /// or do not parse.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() > MAX_ENVELOPE_SIZE {
            return Err(CodecError::MalformedEnvelope(format!(
                "{} bytes exceeds limit of {}",
                bytes.len(),
                MAX_ENVELOPE_SIZE
            )));
        }
        wire::decode(bytes, MAX_ENVELOPE_SIZE).map_err(CodecError::MalformedEnvelope)
    }
}

// Each part is length-prefixed so that no two (domain, type, payload)
// triples share a signing input.
fn signing_bytes(domain: &str, payload_type: &[u8], payload: &[u8]) -> Vec<u8> {
    let parts = [domain.as_bytes(), payload_type, payload];
    let mut buf = Vec::with_capacity(parts.iter().map(|p| p.len() + 8).sum());
    for part in parts {
        buf.extend_from_slice(&(part.len() as u64).to_be_bytes());
        buf.extend_from_slice(part);
    }
    buf
}

/// Seal a peer's identity and addresses into serialized envelope bytes.
///
/// The record's sequence number is read from `clock`.
///
/// # Errors
///
/// Returns [`CodecError::Signing`] or [`CodecError::Serialization`].
pub fn seal<S, C>(
    signer: &S,
    clock: &C,
    peer_id: &PeerId,
    addrs: &[Multiaddr],
) -> Result<Vec<u8>, CodecError>
where
    S: Signer + ?Sized,
    C: Clock + ?Sized,
{
    let record = PeerRecord::new(*peer_id, addrs.to_vec(), clock);
    let envelope = Envelope::seal(
        signer,
        PEER_RECORD_ENVELOPE_DOMAIN,
        PEER_RECORD_PAYLOAD_TYPE,
        record.to_bytes()?,
    )?;
    let bytes = envelope.to_bytes()?;

    tracing::debug!(
        "Sealed peer record for {} ({} addrs, seq {})",
        peer_id,
        addrs.len(),
        record.seq
    );
    Ok(bytes)
}

/// Verify an envelope with Ed25519 and return the peer's address information.
///
/// # Errors
///
/// See [`unseal_with`].
pub fn unseal(bytes: &[u8]) -> Result<AddrInfo, CodecError> {
    unseal_with(&Ed25519Verifier, bytes)
}

/// Verify an envelope and return the peer's address information.
///
/// # Errors
///
/// - [`CodecError::MissingEnvelope`] if `bytes` is empty
/// - [`CodecError::MalformedEnvelope`] if `bytes` is not an envelope
/// - [`CodecError::SignatureInvalid`] if the signature does not verify
/// - [`CodecError::WrongRecordType`] if the payload is not a peer record
pub fn unseal_with<V: SignatureVerifier + ?Sized>(
    verifier: &V,
    bytes: &[u8],
) -> Result<AddrInfo, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::MissingEnvelope);
    }
    let envelope = Envelope::from_bytes(bytes)?;
    open_peer_record(verifier, &envelope).map(|record| record.addr_info())
}

/// Verify an already-parsed envelope, as carried in discover responses.
///
/// # Errors
///
/// Returns [`CodecError::MissingEnvelope`] for `None`, otherwise as [`unseal_with`].
pub fn unseal_envelope(envelope: Option<&Envelope>) -> Result<AddrInfo, CodecError> {
    let envelope = envelope.ok_or(CodecError::MissingEnvelope)?;
    open_peer_record(&Ed25519Verifier, envelope).map(|record| record.addr_info())
}

/// Verify `envelope` and decode the full peer record, sequence number included.
///
/// # Errors
///
/// Returns [`CodecError::SignatureInvalid`] or [`CodecError::WrongRecordType`].
pub fn open_peer_record<V: SignatureVerifier + ?Sized>(
    verifier: &V,
    envelope: &Envelope,
) -> Result<PeerRecord, CodecError> {
    let payload = envelope
        .open(verifier, PEER_RECORD_ENVELOPE_DOMAIN)
        .inspect_err(|e| tracing::debug!("Rejected peer record envelope: {}", e))?;

    if envelope.payload_type != PEER_RECORD_PAYLOAD_TYPE {
        return Err(CodecError::WrongRecordType);
    }
    PeerRecord::from_bytes(payload)
}
