//! Transport abstraction — any byte-oriented channel.
//!
//! Concrete implementations live outside this crate:
//! - hardware UART
//! - Bluetooth serial module on a software UART
//!
//! The session controller is generic over `Transport`, so adding a new
//! channel requires zero changes to the framing or session logic, and the
//! whole stack runs against an in-memory double in tests.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Number of bytes ready to read without blocking.
    fn available(&self) -> usize;

    /// Read one byte. Call only while [`available`](Self::available) is
    /// non-zero.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Queue one byte for transmission.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A null transport that discards all writes and never has data.
/// Useful as a stand-in while the real link is not wired up.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn available(&self) -> usize {
        0
    }

    fn read_byte(&mut self) -> Result<u8, ()> {
        Err(())
    }

    fn write_byte(&mut self, _byte: u8) -> Result<(), ()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
