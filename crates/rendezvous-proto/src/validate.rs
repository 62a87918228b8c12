//! Bounds checks a rendezvous point applies to incoming requests.
//!
//! The request builders never call these; a zero or negative TTL or limit
//! simply means "use the default".

use crate::DEFAULT_TTL;
use crate::error::{RendezvousError, ResponseStatus};
use crate::message::{Discover, MAX_MESSAGE_SIZE, Register};
use crate::record::MAX_ENVELOPE_SIZE;

/// Longest registration TTL a rendezvous point grants (72 hours).
pub const MAX_TTL: i64 = 72 * 3600;

/// Longest namespace accepted.
pub const MAX_NAMESPACE_LENGTH: usize = 256;

/// Largest signed peer record accepted in a registration.
pub const MAX_SIGNED_RECORD_SIZE: usize = 2048;

/// Most registrations returned by one discovery.
pub const MAX_DISCOVER_LIMIT: i64 = 1000;

/// Bytes a discovered registration adds beyond its namespace and envelope:
/// namespace length prefix and TTL.
const REGISTRATION_OVERHEAD: usize = 8 + 8;

/// Message tag, status, absent status text and registration count.
const DISCOVER_RESPONSE_OVERHEAD: usize = 4 + 4 + 1 + 8;

/// Encoded size of the largest discovery response a validating rendezvous
/// point can produce.
pub const MAX_DISCOVER_RESPONSE_SIZE: usize = MAX_DISCOVER_LIMIT as usize
    * (MAX_NAMESPACE_LENGTH + MAX_SIGNED_RECORD_SIZE + REGISTRATION_OVERHEAD)
    + DISCOVER_RESPONSE_OVERHEAD;

const _: () = assert!(MAX_SIGNED_RECORD_SIZE <= MAX_ENVELOPE_SIZE);
const _: () = assert!(MAX_DISCOVER_RESPONSE_SIZE <= MAX_MESSAGE_SIZE);

/// TTL to apply for a requested value.
#[must_use]
pub fn effective_ttl(ttl: Option<i64>) -> i64 {
    match ttl {
        Some(t) if t > 0 => t,
        _ => DEFAULT_TTL,
    }
}

/// Result limit to apply for a requested value.
#[must_use]
pub fn effective_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(MAX_DISCOVER_LIMIT),
        _ => MAX_DISCOVER_LIMIT,
    }
}

fn validate_namespace(ns: Option<&str>) -> Result<(), RendezvousError> {
    match ns {
        Some(ns) if ns.len() > MAX_NAMESPACE_LENGTH => Err(RendezvousError::new(
            ResponseStatus::InvalidNamespace,
            "namespace too long",
        )),
        _ => Ok(()),
    }
}

/// Check a REGISTER request against protocol limits.
///
/// # Errors
///
/// Returns `E_INVALID_NAMESPACE`, `E_INVALID_TTL` or `E_INVALID_PEER_INFO`.
pub fn validate_register(register: &Register) -> Result<(), RendezvousError> {
    validate_namespace(register.ns.as_deref())?;

    if register.peer.is_empty() {
        return Err(RendezvousError::new(
            ResponseStatus::InvalidPeerInfo,
            "missing signed peer record",
        ));
    }
    if register.peer.len() > MAX_SIGNED_RECORD_SIZE {
        return Err(RendezvousError::new(
            ResponseStatus::InvalidPeerInfo,
            "signed peer record too large",
        ));
    }

    if effective_ttl(register.ttl) > MAX_TTL {
        return Err(RendezvousError::new(
            ResponseStatus::InvalidTtl,
            "bad ttl",
        ));
    }
    Ok(())
}

/// Check a DISCOVER request against protocol limits.
///
/// # Errors
///
/// Returns `E_INVALID_NAMESPACE`.
pub fn validate_discover(discover: &Discover) -> Result<(), RendezvousError> {
    validate_namespace(discover.ns.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::encode_frame;
    use crate::message::{DiscoverResponse, Message, Registration};
    use crate::record::Envelope;

    fn register(ns: Option<&str>, peer_len: usize, ttl: Option<i64>) -> Register {
        Register {
            ns: ns.map(str::to_string),
            peer: vec![1; peer_len],
            ttl,
        }
    }

    #[test]
    fn test_effective_ttl() {
        assert_eq!(effective_ttl(None), DEFAULT_TTL);
        assert_eq!(effective_ttl(Some(0)), DEFAULT_TTL);
        assert_eq!(effective_ttl(Some(-5)), DEFAULT_TTL);
        assert_eq!(effective_ttl(Some(60)), 60);
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), MAX_DISCOVER_LIMIT);
        assert_eq!(effective_limit(Some(5)), 5);
        assert_eq!(effective_limit(Some(50_000)), MAX_DISCOVER_LIMIT);
    }

    #[test]
    fn test_valid_register() {
        assert!(validate_register(&register(Some("waku"), 200, Some(60))).is_ok());
        assert!(validate_register(&register(None, 200, None)).is_ok());
    }

    #[test]
    fn test_register_namespace_too_long() {
        let ns = "x".repeat(MAX_NAMESPACE_LENGTH + 1);
        let err = validate_register(&register(Some(&ns), 200, None)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidNamespace);
    }

    #[test]
    fn test_register_ttl_too_long() {
        let err = validate_register(&register(None, 200, Some(MAX_TTL + 1))).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidTtl);
        assert!(validate_register(&register(None, 200, Some(MAX_TTL))).is_ok());
    }

    #[test]
    fn test_register_peer_bounds() {
        let err = validate_register(&register(None, 0, None)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidPeerInfo);

        let err =
            validate_register(&register(None, MAX_SIGNED_RECORD_SIZE + 1, None)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidPeerInfo);
    }

    #[test]
    fn test_validate_discover() {
        assert!(validate_discover(&Discover::default()).is_ok());

        let discover = Discover {
            ns: Some("y".repeat(MAX_NAMESPACE_LENGTH + 1)),
            limit: None,
        };
        assert_eq!(
            validate_discover(&discover).unwrap_err().status,
            ResponseStatus::InvalidNamespace
        );
    }

    #[test]
    fn test_largest_discover_response_fits_in_frame() {
        let mut envelope = Envelope {
            public_key: vec![7; 32],
            payload_type: vec![0x03, 0x01],
            payload: Vec::new(),
            signature: vec![9; 64],
        };
        let fixed = envelope.to_bytes().unwrap().len();
        envelope.payload = vec![1; MAX_SIGNED_RECORD_SIZE - fixed];
        assert_eq!(envelope.to_bytes().unwrap().len(), MAX_SIGNED_RECORD_SIZE);

        let registration = Registration {
            ns: "n".repeat(MAX_NAMESPACE_LENGTH),
            peer: envelope,
            ttl: MAX_TTL,
        };
        let message: Message = DiscoverResponse {
            status: ResponseStatus::Ok,
            status_text: None,
            registrations: vec![registration; MAX_DISCOVER_LIMIT as usize],
        }
        .into();

        assert_eq!(message.to_bytes().unwrap().len(), MAX_DISCOVER_RESPONSE_SIZE);
        assert!(encode_frame(&message).is_ok());
    }
}
