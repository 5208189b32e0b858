//! Cascade-checksum frame codec.
//!
//! Wire format:
//! ```text
//! ┌───────────┬─────────────┬────────────────────┬────────────────┐
//! │ 0x0A      │ Length (1B) │ Payload (1–127 B)  │ Checksum (N B) │
//! │ magic     │ i8, > 0     │ verbatim           │ cascade levels │
//! └───────────┴─────────────┴────────────────────┴────────────────┘
//! ```
//!
//! The link performs no byte stuffing, so the magic byte can legitimately
//! occur inside a payload. After a rejected frame the decoder therefore
//! treats every observed magic byte with suspicion: it resynchronizes on it
//! only with a configured probability (reference 0.75), trading recovery
//! latency against repeatedly misreading payload bytes as frame starts.
//! The filter is a tunable heuristic, not a correctness mechanism — a false
//! resync still ends in a checksum mismatch.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::checksum::CascadeChecksum;
use crate::config::LinkConfig;
use crate::error::FrameError;

/// Frame start sentinel (`\n`).
pub const MAGIC_BYTE: u8 = 0x0A;

/// Maximum payload length (hard ceiling of the signed length byte).
pub const MAX_PAYLOAD_LEN: usize = 127;

/// Full frame: magic + length + payload + checksum trailer.
const MAX_FRAME_LEN: usize = 2 + MAX_PAYLOAD_LEN + super::checksum::MAX_ORDER;

/// The resync filter needs a fair coin, not entropy; a fixed seed keeps
/// recovery behaviour replayable.
const DEFAULT_RESYNC_SEED: u64 = 0x0bad_5eed;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Scanning for the magic byte between frames.
    WaitSync,
    /// Magic seen; the next byte declares the payload length.
    ReadLength,
    /// Collecting payload bytes.
    ReadPayload { expected: usize },
    /// Payload complete; comparing trailer elements in order.
    ReadChecksum { index: usize },
    /// A frame was rejected; scanning for the magic byte through the
    /// probabilistic acceptance filter.
    Failed,
}

/// Streaming frame decoder.
///
/// Owns the single receive buffer. Invalid states are unrepresentable: the
/// state enum replaces the traditional "unknown state resets to initial"
/// fallback arm of a switch-on-integer decoder.
pub struct FrameDecoder {
    state: DecoderState,
    payload: heapless::Vec<u8, MAX_PAYLOAD_LEN>,
    checksum: CascadeChecksum,
    resync_accept: f32,
    rng: ChaCha8Rng,
    frames_decoded: u32,
    frames_failed: u32,
    last_error: Option<FrameError>,
}

impl FrameDecoder {
    pub fn new(config: &LinkConfig) -> Self {
        Self::with_seed(config, DEFAULT_RESYNC_SEED)
    }

    /// Decoder with an explicit resync RNG seed, for deterministic recovery
    /// tests.
    pub fn with_seed(config: &LinkConfig, seed: u64) -> Self {
        Self {
            state: DecoderState::WaitSync,
            payload: heapless::Vec::new(),
            checksum: CascadeChecksum::new(config.checksum_order),
            resync_accept: config.resync_accept_probability,
            rng: ChaCha8Rng::seed_from_u64(seed),
            frames_decoded: 0,
            frames_failed: 0,
            last_error: None,
        }
    }

    /// Feed one received byte.
    ///
    /// Returns the completed payload when `byte` finishes a verified frame.
    /// The slice lives in the decoder's single receive buffer and is
    /// overwritten once a later byte opens a new payload, so it must be
    /// consumed before the next call.
    pub fn accept(&mut self, byte: u8) -> Option<&[u8]> {
        match self.state {
            DecoderState::WaitSync => {
                if byte == MAGIC_BYTE {
                    self.state = DecoderState::ReadLength;
                }
            }

            DecoderState::ReadLength => {
                // A declared length of zero could mark an empty frame; the
                // host protocol has no use for one, so it is rejected along
                // with the negative values.
                let declared = byte as i8;
                if declared > 0 {
                    self.payload.clear();
                    self.checksum.init();
                    self.state = DecoderState::ReadPayload {
                        expected: declared as usize,
                    };
                } else {
                    self.fail(FrameError::InvalidLength(declared));
                }
            }

            DecoderState::ReadPayload { expected } => {
                let _ = self.payload.push(byte);
                self.checksum.update(byte);
                if self.payload.len() == expected {
                    self.state = DecoderState::ReadChecksum { index: 0 };
                }
            }

            DecoderState::ReadChecksum { index } => {
                if byte != self.checksum.value(index) {
                    // The remaining trailer bytes of this frame are now
                    // ordinary stream noise for the Failed scan.
                    self.fail(FrameError::ChecksumMismatch { index: index as u8 });
                } else if index + 1 == self.checksum.order() {
                    self.frames_decoded = self.frames_decoded.wrapping_add(1);
                    self.state = DecoderState::WaitSync;
                    return Some(self.payload.as_slice());
                } else {
                    self.state = DecoderState::ReadChecksum { index: index + 1 };
                }
            }

            DecoderState::Failed => {
                if byte == MAGIC_BYTE && self.rng.r#gen::<f32>() < self.resync_accept {
                    self.state = DecoderState::ReadLength;
                }
            }
        }

        None
    }

    /// Drop any partially received frame and return to the initial scan
    /// (e.g. after an external session reset).
    pub fn reset(&mut self) {
        self.state = DecoderState::WaitSync;
        self.payload.clear();
    }

    /// Frames returned since construction.
    pub fn frames_decoded(&self) -> u32 {
        self.frames_decoded
    }

    /// Frames discarded for an invalid length or a checksum mismatch.
    pub fn frames_failed(&self) -> u32 {
        self.frames_failed
    }

    /// The reason for the most recent discard, if any.
    pub fn last_error(&self) -> Option<FrameError> {
        self.last_error
    }

    fn fail(&mut self, err: FrameError) {
        debug!("frame rejected: {err}");
        self.last_error = Some(err);
        self.frames_failed = self.frames_failed.wrapping_add(1);
        self.state = DecoderState::Failed;
    }
}

/// Frame builder.
///
/// Owns a single output buffer that every `build` call overwrites; a built
/// frame must be fully transmitted before the next call.
pub struct FrameEncoder {
    checksum: CascadeChecksum,
    buf: heapless::Vec<u8, MAX_FRAME_LEN>,
}

impl FrameEncoder {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            checksum: CascadeChecksum::new(config.checksum_order),
            buf: heapless::Vec::new(),
        }
    }

    /// Frame `payload` for transmission:
    /// `[magic][len][payload][checksum trailer]`.
    ///
    /// Returns `None` when the payload is longer than the length byte can
    /// express; no partial frame is ever produced.
    pub fn build(&mut self, payload: &[u8]) -> Option<&[u8]> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return None;
        }

        self.buf.clear();
        let _ = self.buf.push(MAGIC_BYTE);
        let _ = self.buf.push(payload.len() as u8);

        self.checksum.init();
        for &b in payload {
            let _ = self.buf.push(b);
            self.checksum.update(b);
        }
        let _ = self.buf.extend_from_slice(self.checksum.as_slice());

        Some(self.buf.as_slice())
    }
}
