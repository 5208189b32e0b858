//! Wire commands exchanged with the host.
//!
//! Every frame payload starts with a one-byte tag followed by a
//! fixed-length body. The session dispatches on the tag and echoes each
//! applied command back to the host, so the same encodings serve both
//! directions:
//!
//! | tag | meaning                          | body                      |
//! |-----|----------------------------------|---------------------------|
//! | 0   | handshake flag                   | 1 byte                    |
//! | 1   | angular-velocity setpoint / echo | 4 bytes, IEEE-754 f32 LE  |
//! | 2   | thermal mode / echo              | 1 byte signed, {-1, 0, 1} |

use log::warn;

use crate::error::CommandError;

/// Link-establishment ping, broadcast while awaiting first contact.
pub const TAG_HANDSHAKE: u8 = 0;
/// Turntable angular-velocity setpoint and its echo.
pub const TAG_VELOCITY: u8 = 1;
/// Thermal stage mode and its echo.
pub const TAG_THERMAL: u8 = 2;

/// Longest command payload (tag + f32 body).
pub const MAX_COMMAND_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Thermal mode
// ---------------------------------------------------------------------------

/// Thermal stage mode: the Peltier either cools, heats, or is disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i8)]
pub enum ThermalMode {
    Cool = -1,
    #[default]
    Off = 0,
    Heat = 1,
}

impl ThermalMode {
    /// Wire byte for command bodies and echo frames.
    pub const fn as_byte(self) -> u8 {
        self as i8 as u8
    }

    /// Decode a mode byte. Out-of-range values degrade to `Off`, which
    /// leaves the Peltier disconnected.
    pub fn from_byte(byte: u8) -> Self {
        match byte as i8 {
            -1 => Self::Cool,
            1 => Self::Heat,
            0 => Self::Off,
            other => {
                warn!("unknown thermal mode {other}, disconnecting");
                Self::Off
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A decoded host command (or an echo about to be encoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Link-establishment ping. Outbound only; ignored when received.
    Handshake(u8),
    /// Angular-velocity setpoint for the turntable stepper (rad/s).
    Velocity(f32),
    /// Thermal stage mode.
    Thermal(ThermalMode),
}

impl Command {
    /// Parse a verified frame payload.
    ///
    /// The float body is reassembled with an explicit little-endian
    /// bit-pattern conversion; nothing here depends on in-memory layout.
    pub fn parse(payload: &[u8]) -> Result<Self, CommandError> {
        let (&tag, body) = payload.split_first().ok_or(CommandError::Empty)?;
        match tag {
            TAG_HANDSHAKE => {
                expect_body(tag, 1, body.len())?;
                Ok(Self::Handshake(body[0]))
            }
            TAG_VELOCITY => {
                expect_body(tag, 4, body.len())?;
                Ok(Self::Velocity(f32::from_le_bytes([
                    body[0], body[1], body[2], body[3],
                ])))
            }
            TAG_THERMAL => {
                expect_body(tag, 1, body.len())?;
                Ok(Self::Thermal(ThermalMode::from_byte(body[0])))
            }
            other => Err(CommandError::UnknownTag(other)),
        }
    }

    /// Encode into `buf`, returning the used prefix.
    pub fn encode<'a>(&self, buf: &'a mut [u8; MAX_COMMAND_LEN]) -> &'a [u8] {
        match self {
            Self::Handshake(flag) => {
                buf[0] = TAG_HANDSHAKE;
                buf[1] = *flag;
                &buf[..2]
            }
            Self::Velocity(rad_per_sec) => {
                buf[0] = TAG_VELOCITY;
                buf[1..5].copy_from_slice(&rad_per_sec.to_le_bytes());
                &buf[..5]
            }
            Self::Thermal(mode) => {
                buf[0] = TAG_THERMAL;
                buf[1] = mode.as_byte();
                &buf[..2]
            }
        }
    }
}

fn expect_body(tag: u8, expected: usize, got: usize) -> Result<(), CommandError> {
    if expected == got {
        Ok(())
    } else {
        Err(CommandError::BodyLength {
            tag,
            expected: expected as u8,
            got: got as u8,
        })
    }
}
