//! REGISTER and DISCOVER request construction.

use crate::clock::Clock;
use crate::error::CodecError;
use crate::message::{Discover, Message, Register};
use crate::peer::AddrInfo;
use crate::record::seal;
use rendezvous_crypto::Signer;

/// Build a REGISTER request carrying a freshly sealed peer record.
///
/// An empty `namespace` is left unset, as is a `ttl` of zero or less.
///
/// # Errors
///
/// Propagates [`CodecError::Signing`] and [`CodecError::Serialization`]
/// from sealing.
pub fn new_register_request<S, C>(
    signer: &S,
    clock: &C,
    namespace: &str,
    addr_info: &AddrInfo,
    ttl: i64,
) -> Result<Message, CodecError>
where
    S: Signer + ?Sized,
    C: Clock + ?Sized,
{
    let peer = seal(signer, clock, &addr_info.id, &addr_info.addrs)?;

    Ok(Message::Register(Register {
        ns: non_empty(namespace),
        peer,
        ttl: positive(ttl),
    }))
}

/// Build a DISCOVER request.
///
/// An empty `namespace` is left unset, as is a `limit` of zero or less.
#[must_use]
pub fn new_discover_request(namespace: &str, limit: i64) -> Message {
    Message::Discover(Discover {
        ns: non_empty(namespace),
        limit: positive(limit),
    })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn positive(n: i64) -> Option<i64> {
    (n > 0).then_some(n)
}
