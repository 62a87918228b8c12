//! In-memory rendezvous point.
//!
//! Plays the server side of the protocol on top of the codec: validates and
//! verifies registrations, stores them as [`RegistrationRecord`]s and answers
//! discovery from the store. There is no expiry; TTLs are only recorded.

use rendezvous_proto::validate::{effective_limit, effective_ttl, validate_discover, validate_register};
use rendezvous_proto::{
    CodecError, DiscoverResponse, Message, PeerId, RegisterResponse, RegistrationRecord,
    RendezvousError, ResponseStatus, new_discover_response_ok, new_register_response_ok, unseal,
};

/// A registration plus who made it.
struct Entry {
    peer: PeerId,
    record: RegistrationRecord,
}

/// Rendezvous point backed by a vector, in registration order.
#[derive(Default)]
pub struct RendezvousPoint {
    entries: Vec<Entry>,
}

impl RendezvousPoint {
    /// Create an empty rendezvous point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a raw record directly, bypassing verification.
    pub fn insert_raw(&mut self, peer: PeerId, record: RegistrationRecord) {
        self.entries.push(Entry { peer, record });
    }

    /// Decode a request frame body, handle it and encode the response.
    pub fn handle_bytes(&mut self, request: &[u8]) -> Result<Vec<u8>, CodecError> {
        let request = Message::from_bytes(request)?;
        self.handle(request)?.to_bytes()
    }

    /// Handle one request message.
    ///
    /// Protocol failures become error responses; a corrupt store surfaces
    /// as a codec error.
    pub fn handle(&mut self, request: Message) -> Result<Message, CodecError> {
        match request {
            Message::Register(register) => {
                let response = self
                    .register(register)
                    .unwrap_or_else(|e| RegisterResponse::from(&e));
                Ok(response.into())
            }
            Message::Discover(discover) => {
                if let Err(e) = validate_discover(&discover) {
                    return Ok(DiscoverResponse::from(&e).into());
                }
                let ns = discover.ns.unwrap_or_default();
                let limit = effective_limit(discover.limit) as usize;
                let matching: Vec<RegistrationRecord> = self
                    .entries
                    .iter()
                    .filter(|e| ns.is_empty() || e.record.ns == ns)
                    .take(limit)
                    .map(|e| e.record.clone())
                    .collect();
                Ok(new_discover_response_ok(&matching)?.into())
            }
            other => {
                let err = RendezvousError::new(
                    ResponseStatus::InternalError,
                    format!("unexpected {} message", other.message_type()),
                );
                Err(err.into())
            }
        }
    }

    fn register(
        &mut self,
        register: rendezvous_proto::Register,
    ) -> Result<RegisterResponse, RendezvousError> {
        validate_register(&register)?;
        let info = unseal(&register.peer)?;
        let ns = register.ns.unwrap_or_default();
        let ttl = effective_ttl(register.ttl);

        // A fresh registration replaces the peer's previous one in the namespace.
        self.entries.retain(|e| !(e.peer == info.id && e.record.ns == ns));
        self.entries.push(Entry {
            peer: info.id,
            record: RegistrationRecord {
                ns,
                peer_envelope: register.peer,
                ttl,
            },
        });
        Ok(new_register_response_ok(ttl))
    }
}
