//! Framed serial link.
//!
//! The host and the CalBox exchange short binary commands over an
//! unreliable, unescaped byte channel (UART or a Bluetooth serial module).
//! This module turns that raw stream into discrete, checksum-verified
//! payloads and back:
//!
//! ```text
//! ┌────────────┐    ┌───────────────┐    ┌────────────────────────┐
//! │ Transport  │───▶│ FrameDecoder  │───▶│ SessionController      │
//! │ (trait)    │    │ (byte-at-a-   │    │ (dispatch + echo)      │
//! │            │◀───│  time FSM)    │    │                        │
//! │            │    ├───────────────┤    │                        │
//! │            │◀───│ FrameEncoder  │◀───│                        │
//! └────────────┘    └───────────────┘    └────────────────────────┘
//! ```
//!
//! There is no byte stuffing and no link-level retransmission: a corrupted
//! frame is discarded wholesale and the decoder hunts for the next frame
//! start with a probabilistic filter (see [`codec`]).

pub mod checksum;
pub mod codec;
pub mod transport;

pub use self::checksum::CascadeChecksum;
pub use self::codec::{FrameDecoder, FrameEncoder, MAGIC_BYTE, MAX_PAYLOAD_LEN};
pub use self::transport::{NullTransport, Transport};
