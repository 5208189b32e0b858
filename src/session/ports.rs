//! Port traits — the boundary between the session core and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SessionController (domain)
//! ```
//!
//! Driven adapters (stepper driver, Peltier relay sequencing, hardware
//! timer, telemetry sinks) implement these traits. The
//! [`SessionController`](super::SessionController) consumes them via
//! generics, so the session core never touches pins or peripherals and the
//! whole state machine runs host-side against mocks.

use super::command::ThermalMode;
use super::events::SessionEvent;

// ───────────────────────────────────────────────────────────────
// Rig port (driven adapter: domain → actuation)
// ───────────────────────────────────────────────────────────────

/// Actuation port: the turntable stepper and the thermal stage.
pub trait RigPort {
    /// Request an angular velocity (rad/s). The driver returns the velocity
    /// it can actually sustain — stepper rate quantisation means the
    /// achievable value may differ from the request — and the achieved
    /// value is what gets echoed to the host.
    fn apply_velocity(&mut self, rad_per_sec: f32) -> f32;

    /// Switch the thermal stage mode (relay and Peltier sequencing).
    fn apply_thermal(&mut self, mode: ThermalMode);

    /// Advance the stepper update cycle. Called once per active tick,
    /// before any inbound bytes are drained.
    fn tick(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: domain → clock)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source and blocking delay.
pub trait TimePort {
    /// Microseconds since boot. Wraps at `u32::MAX`; consumers must use
    /// wrapping subtraction for intervals.
    fn now_micros(&mut self) -> u32;

    /// Block for `ms` milliseconds. Only the handshake and terminal states
    /// may call this; the active tick must never block.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The session emits structured [`SessionEvent`]s through this port.
/// Adapters decide where they go (serial log, telemetry, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &SessionEvent);
}
