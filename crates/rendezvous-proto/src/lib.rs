//! # Rendezvous Proto
//!
//! Message codec for the rendezvous peer-discovery protocol.
//!
//! Peers register a signed record of their addresses under a namespace at a
//! rendezvous point; other peers discover registrants by namespace. This
//! crate provides:
//! - Sealing and verifying signed peer records ([`record`])
//! - REGISTER and DISCOVER request builders ([`request`])
//! - Success and error response builders ([`response`])
//! - The wire message union and its framing ([`message`], [`framing`])
//! - Protocol limit checks for rendezvous points ([`validate`])
//!
//! Every operation is a pure function of its inputs; transport, storage and
//! request orchestration live elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use rendezvous_crypto::{Signer, SigningKey};
//! use rendezvous_proto::clock::SystemClock;
//! use rendezvous_proto::peer::{AddrInfo, PeerId};
//! use rendezvous_proto::request::new_register_request;
//! use rendezvous_proto::framing::encode_frame;
//!
//! let key = SigningKey::from_bytes(&[1u8; 32]);
//! let info = AddrInfo::new(
//!     PeerId::from_public_key(&key.public_key()),
//!     vec!["/ip4/127.0.0.1/tcp/60000".parse().unwrap()],
//! );
//!
//! let msg = new_register_request(&key, &SystemClock, "waku", &info, 3600).unwrap();
//! let frame = encode_frame(&msg).unwrap();
//! assert!(!frame.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod framing;
pub mod message;
pub mod peer;
pub mod record;
pub mod request;
pub mod response;
pub mod validate;

mod wire;

/// Protocol identifier negotiated by the transport.
pub const PROTOCOL_ID: &str = "/vac/waku/rendezvous/0.0.1";

/// TTL applied when a request or response omits one (2 hours).
pub const DEFAULT_TTL: i64 = 2 * 3600;

// Re-export commonly used types
pub use error::{CodecError, RendezvousError, ResponseStatus, UnknownStatusCode};
pub use message::{
    Discover, DiscoverResponse, Message, MessageType, Register, RegisterResponse, Registration,
};
pub use peer::{AddrInfo, Multiaddr, PeerId};
pub use record::{Envelope, PeerRecord, seal, unseal, unseal_envelope, unseal_with};
pub use request::{new_discover_request, new_register_request};
pub use response::{
    RegistrationRecord, new_discover_response_error, new_discover_response_ok,
    new_register_response_error, new_register_response_ok,
};
