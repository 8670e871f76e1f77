//! Fuzz target: `Frame::decode` + inbound filter
//!
//! Drives arbitrary received bytes through the decoder and both filter
//! modes, asserting that nothing panics and that whatever is accepted
//! respects the frame layout.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use commander::NetworkAddress;
use commander::protocol::filter::{Accepted, FilterMode, classify};
use commander::protocol::{Frame, MAX_PAYLOAD_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(local) = NetworkAddress::parse("AB", "1") else {
        return;
    };

    if let Ok(frame) = Frame::decode(data) {
        assert_eq!(frame.body().len() + 4, data.len());
        if let Some(payload) = frame.payload() {
            assert!(!payload.is_empty());
            assert!(payload.len() <= MAX_PAYLOAD_LEN);
        }
    }

    for mode in [FilterMode::Receive, FilterMode::AckCheck] {
        match classify(data, &local, mode) {
            Ok(Accepted::Data { payload, nonce }) => {
                assert_eq!(&data[..3], b"AB1");
                assert_eq!(&data[data.len() - 3..], nonce.as_bytes());
                assert_eq!(payload.len() + 7, data.len());
            }
            Ok(Accepted::Ack(nonce)) => {
                assert_eq!(&data[..2], b"AB");
                assert_eq!(&data[data.len() - 3..], nonce.as_bytes());
            }
            Err(_) => {}
        }
    }
});
