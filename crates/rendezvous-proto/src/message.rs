//! Rendezvous protocol message definitions.

use crate::error::{CodecError, RendezvousError, ResponseStatus};
use crate::peer::AddrInfo;
use crate::record::{Envelope, unseal_envelope};
use crate::{DEFAULT_TTL, wire};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Largest encoded message accepted by the decoder.
///
/// Holds a full discovery response at the validation limits.
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Message kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Registration request
    Register = 0,
    /// Registration response
    RegisterResponse = 1,
    /// Discovery request
    Discover = 3,
    /// Discovery response
    DiscoverResponse = 4,
}

impl MessageType {
    /// Numeric wire value.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up a message kind by its numeric wire value.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Register),
            1 => Some(Self::RegisterResponse),
            3 => Some(Self::Discover),
            4 => Some(Self::DiscoverResponse),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Register => "REGISTER",
            Self::RegisterResponse => "REGISTER_RESPONSE",
            Self::Discover => "DISCOVER",
            Self::DiscoverResponse => "DISCOVER_RESPONSE",
        };
        f.write_str(name)
    }
}

/// Top-level rendezvous message. Exactly one payload per message.
///
/// Encoded as the [`MessageType`] code followed by the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ask the rendezvous point to register a signed peer record
    Register(Register),
    /// Outcome of a registration
    RegisterResponse(RegisterResponse),
    /// Ask for registrations in a namespace
    Discover(Discover),
    /// Registrations matching a discovery request
    DiscoverResponse(DiscoverResponse),
}

/// Registration request payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Register {
    /// Namespace; `None` is the default namespace
    pub ns: Option<String>,
    /// Serialized signed envelope
    pub peer: Vec<u8>,
    /// Requested TTL in seconds; `None` uses [`DEFAULT_TTL`]
    pub ttl: Option<i64>,
}

/// Discovery request payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Discover {
    /// Namespace filter; `None` matches all
    pub ns: Option<String>,
    /// Maximum number of results; `None` uses the server default
    pub limit: Option<i64>,
}

/// Registration response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Outcome
    pub status: ResponseStatus,
    /// Error description, set only on failure
    pub status_text: Option<String>,
    /// Granted TTL in seconds, set only on success
    pub ttl: Option<i64>,
}

/// One registration returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Namespace the peer registered under
    pub ns: String,
    /// Signed peer record
    pub peer: Envelope,
    /// Remaining TTL in seconds
    pub ttl: i64,
}

/// Discovery response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverResponse {
    /// Outcome
    pub status: ResponseStatus,
    /// Error description, set only on failure
    pub status_text: Option<String>,
    /// Matching registrations in store order, empty on failure
    pub registrations: Vec<Registration>,
}

impl Message {
    /// Serialize message to bytes
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialization`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        wire::encode(self).map_err(CodecError::Serialization)
    }

    /// Deserialize message from bytes
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FrameTooLarge`] for inputs over
    /// [`MAX_MESSAGE_SIZE`] and [`CodecError::Deserialization`] for
    /// anything that is not exactly one message.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(CodecError::FrameTooLarge {
                size: bytes.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        wire::decode(bytes, MAX_MESSAGE_SIZE).map_err(CodecError::Deserialization)
    }

    /// Get the message kind
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Register(_) => MessageType::Register,
            Message::RegisterResponse(_) => MessageType::RegisterResponse,
            Message::Discover(_) => MessageType::Discover,
            Message::DiscoverResponse(_) => MessageType::DiscoverResponse,
        }
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.message_type().code())?;
        match self {
            Message::Register(payload) => tuple.serialize_element(payload)?,
            Message::RegisterResponse(payload) => tuple.serialize_element(payload)?,
            Message::Discover(payload) => tuple.serialize_element(payload)?,
            Message::DiscoverResponse(payload) => tuple.serialize_element(payload)?,
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, MessageVisitor)
    }
}

struct MessageVisitor;

impl<'de> Visitor<'de> for MessageVisitor {
    type Value = Message;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a message type code followed by its payload")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Message, A::Error> {
        let code: i32 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let message_type = MessageType::from_code(code).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Signed(code.into()), &self)
        })?;

        let message = match message_type {
            MessageType::Register => seq.next_element()?.map(Message::Register),
            MessageType::RegisterResponse => seq.next_element()?.map(Message::RegisterResponse),
            MessageType::Discover => seq.next_element()?.map(Message::Discover),
            MessageType::DiscoverResponse => seq.next_element()?.map(Message::DiscoverResponse),
        };
        message.ok_or_else(|| de::Error::invalid_length(1, &self))
    }
}

impl From<RegisterResponse> for Message {
    fn from(response: RegisterResponse) -> Self {
        Message::RegisterResponse(response)
    }
}

impl From<DiscoverResponse> for Message {
    fn from(response: DiscoverResponse) -> Self {
        Message::DiscoverResponse(response)
    }
}

impl RegisterResponse {
    /// Granted TTL, or the protocol error the server reported.
    ///
    /// A successful response without a TTL grants [`DEFAULT_TTL`].
    ///
    /// # Errors
    ///
    /// Returns the carried [`RendezvousError`] when status is not OK.
    pub fn into_result(self) -> Result<i64, RendezvousError> {
        if self.status.is_ok() {
            Ok(self.ttl.unwrap_or(DEFAULT_TTL))
        } else {
            Err(RendezvousError::new(
                self.status,
                self.status_text.unwrap_or_default(),
            ))
        }
    }
}

impl DiscoverResponse {
    /// Registrations, or the protocol error the server reported.
    ///
    /// # Errors
    ///
    /// Returns the carried [`RendezvousError`] when status is not OK.
    pub fn into_result(self) -> Result<Vec<Registration>, RendezvousError> {
        if self.status.is_ok() {
            Ok(self.registrations)
        } else {
            Err(RendezvousError::new(
                self.status,
                self.status_text.unwrap_or_default(),
            ))
        }
    }
}

impl Registration {
    /// Verify the envelope and return the registered peer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SignatureInvalid`] or [`CodecError::WrongRecordType`].
    pub fn addr_info(&self) -> Result<AddrInfo, CodecError> {
        unseal_envelope(Some(&self.peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_envelope() -> Envelope {
        Envelope {
            public_key: vec![1; 32],
            payload_type: vec![0x03, 0x01],
            payload: vec![5, 6, 7],
            signature: vec![9; 64],
        }
    }

    #[test]
    fn test_message_serialization_register() {
        let msg = Message::Register(Register {
            ns: Some("waku".into()),
            peer: vec![1, 2, 3],
            ttl: Some(60),
        });

        let decoded = Message::from_bytes(&msg.to_bytes().unwrap()).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_message_serialization_discover_response() {
        let msg = Message::DiscoverResponse(DiscoverResponse {
            status: ResponseStatus::Ok,
            status_text: None,
            registrations: vec![Registration {
                ns: "waku".into(),
                peer: sample_envelope(),
                ttl: 10,
            }],
        });

        let decoded = Message::from_bytes(&msg.to_bytes().unwrap()).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_absent_fields_survive_encoding() {
        let msg = Message::Discover(Discover::default());
        let decoded = Message::from_bytes(&msg.to_bytes().unwrap()).unwrap();

        let Message::Discover(discover) = decoded else {
            panic!("expected discover, got {:?}", decoded.message_type());
        };
        assert_eq!(discover.ns, None);
        assert_eq!(discover.limit, None);
    }

    #[test]
    fn test_message_type() {
        let msg = Message::Discover(Discover::default());
        assert_eq!(msg.message_type(), MessageType::Discover);
        assert_eq!(msg.message_type().code(), 3);
        assert_eq!(MessageType::from_code(3), Some(MessageType::Discover));
        assert_eq!(MessageType::from_code(2), None);
        assert_eq!(msg.message_type().to_string(), "DISCOVER");
    }

    #[test]
    fn test_wire_tags_are_protocol_codes() {
        let discover = Message::Discover(Discover::default()).to_bytes().unwrap();
        assert_eq!(discover[..4], 3i32.to_le_bytes());

        let found: Message = DiscoverResponse {
            status: ResponseStatus::Ok,
            status_text: None,
            registrations: Vec::new(),
        }
        .into();
        assert_eq!(found.to_bytes().unwrap()[..4], 4i32.to_le_bytes());

        let rejected: Message = RegisterResponse {
            status: ResponseStatus::InvalidPeerInfo,
            status_text: None,
            ttl: None,
        }
        .into();
        let bytes = rejected.to_bytes().unwrap();
        assert_eq!(bytes[..4], 1i32.to_le_bytes());
        assert_eq!(bytes[4..8], 101i32.to_le_bytes());
        assert_eq!(Message::from_bytes(&bytes).unwrap(), rejected);
    }

    #[test]
    fn test_unknown_codes_rejected() {
        let mut bytes = Message::Discover(Discover::default()).to_bytes().unwrap();
        bytes[..4].copy_from_slice(&2i32.to_le_bytes());
        assert!(matches!(
            Message::from_bytes(&bytes),
            Err(CodecError::Deserialization(_))
        ));

        let mut bytes = Message::from(RegisterResponse {
            status: ResponseStatus::Ok,
            status_text: None,
            ttl: Some(60),
        })
        .to_bytes()
        .unwrap();
        bytes[4..8].copy_from_slice(&7i32.to_le_bytes());
        assert!(matches!(
            Message::from_bytes(&bytes),
            Err(CodecError::Deserialization(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            Message::from_bytes(&[0xff; 7]),
            Err(CodecError::Deserialization(_))
        ));
        assert!(matches!(
            Message::from_bytes(&[]),
            Err(CodecError::Deserialization(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_oversized() {
        let bytes = vec![0u8; MAX_MESSAGE_SIZE + 1];
        assert!(matches!(
            Message::from_bytes(&bytes),
            Err(CodecError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn test_register_response_into_result() {
        let ok = RegisterResponse {
            status: ResponseStatus::Ok,
            status_text: None,
            ttl: Some(120),
        };
        assert_eq!(ok.into_result(), Ok(120));

        let defaulted = RegisterResponse {
            status: ResponseStatus::Ok,
            status_text: None,
            ttl: None,
        };
        assert_eq!(defaulted.into_result(), Ok(DEFAULT_TTL));

        let err = RegisterResponse {
            status: ResponseStatus::InvalidTtl,
            status_text: Some("too long".into()),
            ttl: None,
        };
        assert_eq!(
            err.into_result(),
            Err(RendezvousError::new(ResponseStatus::InvalidTtl, "too long"))
        );
    }

    #[test]
    fn test_discover_response_into_result() {
        let err = DiscoverResponse {
            status: ResponseStatus::Unavailable,
            status_text: Some("busy".into()),
            registrations: Vec::new(),
        };
        let e = err.into_result().unwrap_err();
        assert_eq!(e.status, ResponseStatus::Unavailable);
        assert_eq!(e.text, "busy");
    }
}
