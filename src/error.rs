//! Unified error types for the CalBox core.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be cheaply recorded in decoder diagnostics and passed through
//! the session controller without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A frame was rejected by the receive state machine.
    Frame(FrameError),
    /// A verified payload did not parse as a known command.
    Command(CommandError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Framing errors
// ---------------------------------------------------------------------------

/// Reasons the frame decoder discards an in-progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The declared payload length was zero or negative.
    InvalidLength(i8),
    /// A received checksum byte did not match the accumulated cascade level.
    ChecksumMismatch {
        /// Index of the first trailer element that disagreed.
        index: u8,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "invalid payload length {len}"),
            Self::ChecksumMismatch { index } => {
                write!(f, "checksum mismatch at level {index}")
            }
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Reasons a verified payload is not dispatched as a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The payload carried no bytes at all.
    Empty,
    /// The leading tag byte is not one the session dispatches.
    UnknownTag(u8),
    /// The body length does not match the tag's fixed encoding.
    BodyLength { tag: u8, expected: u8, got: u8 },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty payload"),
            Self::UnknownTag(tag) => write!(f, "unknown tag {tag}"),
            Self::BodyLength { tag, expected, got } => {
                write!(f, "tag {tag} expects a {expected}-byte body, got {got}")
            }
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
