//! Protocol status codes and codec errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Response status carried by REGISTER and DISCOVER responses.
///
/// Encoded on the wire as its numeric [`code`](Self::code).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "i32", try_from = "i32")]
pub enum ResponseStatus {
    /// Request succeeded
    Ok = 0,
    /// Namespace is malformed or too long
    InvalidNamespace = 100,
    /// Signed peer record is missing, malformed or fails verification
    InvalidPeerInfo = 101,
    /// Requested TTL is out of range
    InvalidTtl = 102,
    /// Discovery cookie is not recognised
    InvalidCookie = 103,
    /// Peer may not perform this operation
    NotAuthorized = 200,
    /// Internal server error
    InternalError = 300,
    /// Service temporarily unavailable
    Unavailable = 400,
}

impl ResponseStatus {
    /// Numeric wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up a status by its numeric wire code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            100 => Some(Self::InvalidNamespace),
            101 => Some(Self::InvalidPeerInfo),
            102 => Some(Self::InvalidTtl),
            103 => Some(Self::InvalidCookie),
            200 => Some(Self::NotAuthorized),
            300 => Some(Self::InternalError),
            400 => Some(Self::Unavailable),
            _ => None,
        }
    }

    /// Canonical status name as used in protocol logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidNamespace => "E_INVALID_NAMESPACE",
            Self::InvalidPeerInfo => "E_INVALID_PEER_INFO",
            Self::InvalidTtl => "E_INVALID_TTL",
            Self::InvalidCookie => "E_INVALID_COOKIE",
            Self::NotAuthorized => "E_NOT_AUTHORIZED",
            Self::InternalError => "E_INTERNAL_ERROR",
            Self::Unavailable => "E_UNAVAILABLE",
        }
    }

    /// Whether this is the success status.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ResponseStatus> for i32 {
    fn from(status: ResponseStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for ResponseStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownStatusCode(code))
    }
}

/// A status code with no matching [`ResponseStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown response status code {0}")]
pub struct UnknownStatusCode(pub i32);

/// A protocol-level failure that is reported to the remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rendezvous error: {text} ({status})")]
pub struct RendezvousError {
    /// Status code sent on the wire
    pub status: ResponseStatus,
    /// Human-readable description
    pub text: String,
}

impl RendezvousError {
    /// Create a new protocol error.
    pub fn new(status: ResponseStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }
}

impl From<CodecError> for RendezvousError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Rendezvous(inner) => inner,
            other => Self::new(other.status(), other.to_string()),
        }
    }
}

/// Errors raised while encoding, decoding, sealing or verifying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No envelope bytes were supplied
    #[error("missing envelope information")]
    MissingEnvelope,

    /// Bytes do not parse as an envelope
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A stored registration holds bytes that do not parse as an envelope
    #[error("malformed stored envelope at index {index}: {reason}")]
    MalformedStoredEnvelope {
        /// Position of the offending record in the input
        index: usize,
        /// Parser error
        reason: String,
    },

    /// Envelope signature does not verify
    #[error("envelope signature verification failed")]
    SignatureInvalid,

    /// Verified payload is not a peer record
    #[error("invalid peer record")]
    WrongRecordType,

    /// Signer failed to produce a signature
    #[error("signing failed: {0}")]
    Signing(String),

    /// Value could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Message bytes could not be deserialized
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Frame or message exceeds the size limit
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Declared or actual size
        size: usize,
        /// Permitted maximum
        max: usize,
    },

    /// Protocol-level error
    #[error(transparent)]
    Rendezvous(#[from] RendezvousError),
}

impl CodecError {
    /// Status to report when this error surfaces on the wire.
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::MissingEnvelope
            | Self::MalformedEnvelope(_)
            | Self::MalformedStoredEnvelope { .. }
            | Self::SignatureInvalid
            | Self::WrongRecordType => ResponseStatus::InvalidPeerInfo,
            Self::Rendezvous(e) => e.status,
            Self::Signing(_)
            | Self::Serialization(_)
            | Self::Deserialization(_)
            | Self::FrameTooLarge { .. } => ResponseStatus::InternalError,
        }
    }
}
