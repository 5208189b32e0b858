//! Link and session configuration parameters
//!
//! All tunable parameters for the CalBox command link. The resync
//! probability and the handshake/liveness periods are deliberate tuning
//! knobs rather than constants baked into the state machines.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Framing-layer configuration. Both ends of the link must agree on
/// `checksum_order`; there is no in-band negotiation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Number of cascade checksum levels appended to every frame (1-127).
    pub checksum_order: u8,
    /// Probability of accepting a magic byte as a new frame start while
    /// recovering from a rejected frame. A latency / false-resync trade-off,
    /// not a correctness mechanism.
    pub resync_accept_probability: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            checksum_order: 2,
            resync_accept_probability: 0.75,
        }
    }
}

impl LinkConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.checksum_order == 0 || self.checksum_order > 127 {
            return Err(Error::Config("checksum_order must be 1-127"));
        }
        if !(0.0..=1.0).contains(&self.resync_accept_probability) {
            return Err(Error::Config(
                "resync_accept_probability must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Session-controller configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Framing parameters shared by the decoder and the encoder.
    pub link: LinkConfig,

    // --- Handshake ---
    /// Flag byte carried in the tag-0 handshake frame.
    pub handshake_flag: u8,
    /// Delay between handshake transmissions while waiting for the host (ms).
    pub handshake_retry_ms: u32,

    // --- Liveness ---
    /// Microseconds of link silence tolerated before the session safes the
    /// rig and goes terminal.
    pub liveness_timeout_us: u32,
    /// Idle period per tick once the session is terminal (ms).
    pub terminal_idle_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            handshake_flag: 1,
            handshake_retry_ms: 1000,
            liveness_timeout_us: 20_000_000,
            terminal_idle_ms: 10_000,
        }
    }
}

impl SessionConfig {
    /// Range-check every field, including the nested link parameters.
    pub fn validate(&self) -> Result<(), Error> {
        self.link.validate()?;
        if self.handshake_retry_ms == 0 {
            return Err(Error::Config("handshake_retry_ms must be non-zero"));
        }
        if self.liveness_timeout_us == 0 {
            return Err(Error::Config("liveness_timeout_us must be non-zero"));
        }
        Ok(())
    }
}
