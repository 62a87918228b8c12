//! REGISTER and DISCOVER response construction.

use crate::error::{CodecError, RendezvousError, ResponseStatus};
use crate::message::{DiscoverResponse, RegisterResponse, Registration};
use crate::record::Envelope;

/// A registration as persisted by the rendezvous store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// Namespace
    pub ns: String,
    /// Serialized envelope exactly as received
    pub peer_envelope: Vec<u8>,
    /// TTL in seconds
    pub ttl: i64,
}

/// Successful registration granting `ttl` seconds.
#[must_use]
pub fn new_register_response_ok(ttl: i64) -> RegisterResponse {
    RegisterResponse {
        status: ResponseStatus::Ok,
        status_text: None,
        ttl: Some(ttl),
    }
}

/// Failed registration.
#[must_use]
pub fn new_register_response_error(
    status: ResponseStatus,
    text: impl Into<String>,
) -> RegisterResponse {
    RegisterResponse {
        status,
        status_text: Some(text.into()),
        ttl: None,
    }
}

/// Successful discovery listing `records` in the given order.
///
/// Envelopes are parsed but not verified; the store only holds envelopes
/// that were verified on registration.
///
/// # Errors
///
/// Returns [`CodecError::MalformedStoredEnvelope`] for the first record
/// whose envelope does not parse. No partial response is produced.
pub fn new_discover_response_ok(
    records: &[RegistrationRecord],
) -> Result<DiscoverResponse, CodecError> {
    let registrations = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let peer = Envelope::from_bytes(&record.peer_envelope).map_err(|e| {
                tracing::warn!(
                    "Stored registration {} in namespace '{}' has a malformed envelope: {}",
                    index,
                    record.ns,
                    e
                );
                CodecError::MalformedStoredEnvelope {
                    index,
                    reason: e.to_string(),
                }
            })?;
            Ok(Registration {
                ns: record.ns.clone(),
                peer,
                ttl: record.ttl,
            })
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    Ok(DiscoverResponse {
        status: ResponseStatus::Ok,
        status_text: None,
        registrations,
    })
}

/// Failed discovery.
#[must_use]
pub fn new_discover_response_error(
    status: ResponseStatus,
    text: impl Into<String>,
) -> DiscoverResponse {
    DiscoverResponse {
        status,
        status_text: Some(text.into()),
        registrations: Vec::new(),
    }
}

impl From<&RendezvousError> for RegisterResponse {
    fn from(err: &RendezvousError) -> Self {
        new_register_response_error(err.status, err.text.clone())
    }
}

impl From<&RendezvousError> for DiscoverResponse {
    fn from(err: &RendezvousError) -> Self {
        new_discover_response_error(err.status, err.text.clone())
    }
}
