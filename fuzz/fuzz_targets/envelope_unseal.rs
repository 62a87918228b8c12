//! Fuzz target for signed peer record verification
//!
//! Unsealing arbitrary bytes must fail cleanly; nothing forged may verify.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rendezvous_proto::record::Envelope;
use rendezvous_proto::{new_discover_response_ok, unseal, RegistrationRecord};

fuzz_target!(|data: &[u8]| {
    assert!(unseal(data).is_err(), "fuzzer forged a valid envelope");

    if let Ok(envelope) = Envelope::from_bytes(data) {
        let _ = envelope.to_bytes();
    }

    let records = [RegistrationRecord {
        ns: String::new(),
        peer_envelope: data.to_vec(),
        ttl: 0,
    }];
    let _ = new_discover_response_ok(&records);
});
