//! Session controller — the outer state machine of the command link.
//!
//! ```text
//!  AWAIT_FIRST_CONTACT ──[inbound bytes]──▶ ACTIVE ──[silence > timeout]──▶ TERMINAL
//!          ▲                                                                (absorbing)
//!          └──────────────────────── reset() ◀───────────────────────────────────┘
//! ```
//!
//! The controller is driven by one [`tick`](SessionController::tick) call
//! per outer-loop iteration. While awaiting first contact it broadcasts a
//! handshake frame and sleeps between attempts; nothing else depends on
//! timing there. Once active, a tick is non-blocking: it advances the rig,
//! drains whatever bytes the transport already has, dispatches every
//! completed command, echoes each applied value, and checks the liveness
//! window. A session that times out safes the rig and stays terminal until
//! an external [`reset`](SessionController::reset).

pub mod command;
pub mod events;
pub mod ports;

use log::{debug, info, warn};

use crate::config::SessionConfig;
use crate::link::codec::{FrameDecoder, FrameEncoder};
use crate::link::transport::Transport;
use self::command::{Command, MAX_COMMAND_LEN, ThermalMode};
use self::events::SessionEvent;
use self::ports::{EventSink, RigPort, TimePort};

/// Session lifecycle states.
///
/// The enum replaces the original switch-on-integer machine; unreachable
/// state values cannot exist, so there is no silent reset-to-initial arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Broadcasting the handshake, waiting for the host to answer.
    AwaitFirstContact,
    /// Dispatching commands and watching the liveness window.
    Active,
    /// Link lost and actuation safed. Absorbing; only `reset()` leaves.
    Terminal,
}

/// Sentinel for "no setpoint requested yet", so the first real request —
/// including 0.0 — always reaches the rig.
const NO_REQUEST: f32 = -1.0;

/// Drives the rig from decoded host commands and enforces link liveness.
///
/// Owns the frame decoder and encoder; the transport, rig, clock, and event
/// sink are passed per call so adapters stay swappable (and mockable).
pub struct SessionController {
    config: SessionConfig,
    state: SessionState,
    decoder: FrameDecoder,
    encoder: FrameEncoder,
    /// Reading of the monotonic clock when the last verified frame arrived.
    last_contact_us: u32,
    /// Most recent velocity the host asked for.
    requested_velocity: f32,
    /// Velocity the rig reported it can sustain; body of every tag-1 echo.
    applied_velocity: f32,
    /// Thermal mode currently applied to the stage.
    thermal: ThermalMode,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            decoder: FrameDecoder::new(&config.link),
            encoder: FrameEncoder::new(&config.link),
            state: SessionState::AwaitFirstContact,
            last_contact_us: 0,
            requested_velocity: NO_REQUEST,
            applied_velocity: 0.0,
            thermal: ThermalMode::Off,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply the safe defaults to the rig once before the first tick.
    pub fn start(&mut self, rig: &mut impl RigPort, sink: &mut impl EventSink) {
        self.applied_velocity = rig.apply_velocity(0.0);
        self.requested_velocity = 0.0;
        rig.apply_thermal(ThermalMode::Off);
        self.thermal = ThermalMode::Off;
        sink.emit(&SessionEvent::Started);
        info!("session ready, awaiting first contact");
    }

    /// Force the safe actuation state and re-arm the handshake.
    ///
    /// The terminal state is absorbing; this is the external restart the
    /// link requires after a liveness timeout.
    pub fn reset(
        &mut self,
        link: &mut impl Transport,
        rig: &mut impl RigPort,
        sink: &mut impl EventSink,
    ) {
        self.enter_safe_state(link, rig, sink);
        self.decoder.reset();
        self.transition(SessionState::AwaitFirstContact, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Velocity most recently confirmed by the rig.
    pub fn applied_velocity(&self) -> f32 {
        self.applied_velocity
    }

    /// Thermal mode most recently applied to the stage.
    pub fn thermal_mode(&self) -> ThermalMode {
        self.thermal
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One outer-loop iteration.
    pub fn tick(
        &mut self,
        link: &mut impl Transport,
        rig: &mut impl RigPort,
        time: &mut impl TimePort,
        sink: &mut impl EventSink,
    ) {
        match self.state {
            SessionState::AwaitFirstContact => self.tick_handshake(link, time, sink),
            SessionState::Active => self.tick_active(link, rig, time, sink),
            // Low-duty idle; nothing left to do without an external reset.
            SessionState::Terminal => time.delay_ms(self.config.terminal_idle_ms),
        }
    }

    fn tick_handshake(
        &mut self,
        link: &mut impl Transport,
        time: &mut impl TimePort,
        sink: &mut impl EventSink,
    ) {
        self.send(link, &Command::Handshake(self.config.handshake_flag));
        time.delay_ms(self.config.handshake_retry_ms);

        // Any inbound traffic at all counts as first contact; the bytes
        // themselves are drained (and framed) by the first active tick.
        if link.available() > 0 {
            self.last_contact_us = time.now_micros();
            info!("first contact established");
            sink.emit(&SessionEvent::LinkEstablished);
            self.transition(SessionState::Active, sink);
        }
    }

    fn tick_active(
        &mut self,
        link: &mut impl Transport,
        rig: &mut impl RigPort,
        time: &mut impl TimePort,
        sink: &mut impl EventSink,
    ) {
        rig.tick();

        // Drain only what has already arrived; the outer loop's cadence
        // drives forward progress.
        while link.available() > 0 {
            let byte = match link.read_byte() {
                Ok(b) => b,
                Err(e) => {
                    warn!("transport read failed: {e:?}");
                    break;
                }
            };

            let command = match self.decoder.accept(byte) {
                Some(payload) => {
                    // Any verified frame is proof the host is alive, even
                    // one the dispatcher goes on to ignore.
                    self.last_contact_us = time.now_micros();
                    match Command::parse(payload) {
                        Ok(cmd) => Some(cmd),
                        Err(err) => {
                            debug!("ignoring frame: {err}");
                            None
                        }
                    }
                }
                None => None,
            };

            if let Some(cmd) = command {
                self.dispatch(cmd, link, rig, sink);
            }
        }

        let silent_us = time.now_micros().wrapping_sub(self.last_contact_us);
        if silent_us > self.config.liveness_timeout_us {
            warn!("link silent for {silent_us} us, safing rig and going terminal");
            self.enter_safe_state(link, rig, sink);
            sink.emit(&SessionEvent::LinkLost { silent_us });
            self.transition(SessionState::Terminal, sink);
        }
    }

    // ── Command dispatch ──────────────────────────────────────

    #[allow(clippy::float_cmp)] // exact repeat-request suppression, not arithmetic
    fn dispatch(
        &mut self,
        cmd: Command,
        link: &mut impl Transport,
        rig: &mut impl RigPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::Velocity(requested) => {
                if requested != self.requested_velocity {
                    self.applied_velocity = rig.apply_velocity(requested);
                    self.requested_velocity = requested;
                    sink.emit(&SessionEvent::VelocityApplied {
                        requested,
                        applied: self.applied_velocity,
                    });
                }
                // Echo the achievable velocity on every request, changed or
                // not — the host reads it as the outer control loop's
                // heartbeat.
                self.send(link, &Command::Velocity(self.applied_velocity));
            }
            Command::Thermal(mode) => {
                rig.apply_thermal(mode);
                self.thermal = mode;
                sink.emit(&SessionEvent::ThermalApplied(mode));
                self.send(link, &Command::Thermal(mode));
            }
            Command::Handshake(_) => {
                // Outbound-only tag; the frame already refreshed liveness.
                debug!("inbound handshake ignored");
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Zero the velocity, disconnect the Peltier, and echo both applied
    /// values so a listening host learns the rig safed itself.
    fn enter_safe_state(
        &mut self,
        link: &mut impl Transport,
        rig: &mut impl RigPort,
        sink: &mut impl EventSink,
    ) {
        self.applied_velocity = rig.apply_velocity(0.0);
        self.requested_velocity = 0.0;
        rig.apply_thermal(ThermalMode::Off);
        self.thermal = ThermalMode::Off;
        sink.emit(&SessionEvent::VelocityApplied {
            requested: 0.0,
            applied: self.applied_velocity,
        });
        sink.emit(&SessionEvent::ThermalApplied(ThermalMode::Off));
        self.send(link, &Command::Velocity(self.applied_velocity));
        self.send(link, &Command::Thermal(ThermalMode::Off));
    }

    fn transition(&mut self, next: SessionState, sink: &mut impl EventSink) {
        if next != self.state {
            info!("session transition: {:?} -> {:?}", self.state, next);
            sink.emit(&SessionEvent::StateChanged {
                from: self.state,
                to: next,
            });
            self.state = next;
        }
    }

    /// Frame a command and push it out byte by byte. Write failures are
    /// logged and tolerated; the liveness timeout is the backstop for a
    /// dead link.
    fn send(&mut self, link: &mut impl Transport, command: &Command) {
        let mut body = [0u8; MAX_COMMAND_LEN];
        let payload = command.encode(&mut body);
        let Some(frame) = self.encoder.build(payload) else {
            // Unreachable for the fixed command encodings.
            warn!("command does not fit a frame");
            return;
        };
        for &byte in frame {
            if let Err(e) = link.write_byte(byte) {
                warn!("transport write failed: {e:?}");
                return;
            }
        }
        if let Err(e) = link.flush() {
            warn!("transport flush failed: {e:?}");
        }
    }
}
