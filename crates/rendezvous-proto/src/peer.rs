//! Peer identities and network addresses.

use rendezvous_crypto::hash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PEER_ID_CONTEXT: &str = "rendezvous 2024 peer id from public key";

/// 32-byte peer identity token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId([u8; 32]);

impl PeerId {
    /// Wrap raw identity bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the identity that belongs to `public_key`.
    #[must_use]
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self(hash::derive(PEER_ID_CONTEXT, public_key))
    }

    /// Raw identity bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", &hex::encode(&self.0[..8]))
    }
}

/// Error parsing a [`PeerId`] or [`Multiaddr`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Peer id is not 64 hex characters
    #[error("invalid peer id: {0}")]
    PeerId(String),
    /// Address does not follow `/proto/value/...` form
    #[error("invalid multiaddr '{0}'")]
    Multiaddr(String),
}

impl FromStr for PeerId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ParseError::PeerId(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| ParseError::PeerId(format!("expected 32 bytes, got {}", v.len())))?;
        Ok(Self(bytes))
    }
}

/// Textual network address such as `/ip4/10.0.0.1/tcp/60000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Multiaddr(String);

impl Multiaddr {
    /// Address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Multiaddr {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let valid = s.len() > 1
            && s.starts_with('/')
            && !s.chars().any(char::is_whitespace)
            && s[1..].split('/').all(|part| !part.is_empty());
        if valid {
            Ok(Self(s))
        } else {
            Err(ParseError::Multiaddr(s))
        }
    }
}

impl FromStr for Multiaddr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<Multiaddr> for String {
    fn from(addr: Multiaddr) -> Self {
        addr.0
    }
}

impl fmt::Display for Multiaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A peer identity together with the addresses it is reachable on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrInfo {
    /// Peer identity
    pub id: PeerId,
    /// Reachable addresses
    pub addrs: Vec<Multiaddr>,
}

impl AddrInfo {
    /// Create address information for a peer.
    #[must_use]
    pub fn new(id: PeerId, addrs: Vec<Multiaddr>) -> Self {
        Self { id, addrs }
    }
}
