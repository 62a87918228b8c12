//! Fuzz target for rendezvous message parsing
//!
//! Tests that the message and frame decoders handle arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rendezvous_proto::Message;
use rendezvous_proto::framing::{decode_frame, encode_frame};

fuzz_target!(|data: &[u8]| {
    if let Ok(msg) = Message::from_bytes(data) {
        // Anything that decodes must re-encode to the same bytes
        let encoded = msg.to_bytes().expect("decoded message re-encodes");
        assert_eq!(encoded, data);
    }

    if let Ok(Some((msg, used))) = decode_frame(data) {
        assert!(used <= data.len());
        let frame = encode_frame(&msg).expect("decoded frame re-encodes");
        assert_eq!(&frame[..], &data[..used]);
    }
});
