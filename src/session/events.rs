//! Outbound session events.
//!
//! The [`SessionController`](super::SessionController) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, fold into telemetry,
//! or record them in a test.

use super::SessionState;
use super::command::ThermalMode;

/// Structured events emitted by the session core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// The controller applied its safe defaults and is ready to tick.
    Started,

    /// First inbound traffic observed; command dispatch is live.
    LinkEstablished,

    /// The session state machine moved.
    StateChanged {
        from: SessionState,
        to: SessionState,
    },

    /// A velocity setpoint reached the rig (requested vs. achievable).
    VelocityApplied { requested: f32, applied: f32 },

    /// A thermal mode reached the rig.
    ThermalApplied(ThermalMode),

    /// The link went silent past the liveness window; actuation was safed.
    LinkLost { silent_us: u32 },
}
