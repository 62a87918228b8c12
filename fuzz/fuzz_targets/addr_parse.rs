//! Fuzz test for peer id and address parsing
//!
//! Tests that arbitrary text doesn't cause panics when parsed as identities or addresses.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rendezvous_proto::{Multiaddr, PeerId};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(id) = s.parse::<PeerId>() {
            assert_eq!(id.to_string(), s.to_lowercase());
        }

        if let Ok(addr) = s.parse::<Multiaddr>() {
            assert_eq!(addr.as_str(), s);
        }
    }
});
