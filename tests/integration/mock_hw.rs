//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full command history
//! without touching a serial port, a stepper, or a hardware timer.

use std::collections::VecDeque;

use calbox::config::LinkConfig;
use calbox::link::codec::FrameDecoder;
use calbox::link::transport::Transport;
use calbox::session::command::ThermalMode;
use calbox::session::events::SessionEvent;
use calbox::session::ports::{EventSink, RigPort, TimePort};

// ── MockLink ──────────────────────────────────────────────────

/// In-memory byte channel: a queue of inbound bytes and a log of every
/// byte the session wrote.
pub struct MockLink {
    pub inbound: VecDeque<u8>,
    pub outbound: Vec<u8>,
    pub flushes: usize,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            outbound: Vec::new(),
            flushes: 0,
        }
    }

    /// Queue raw bytes for the session to read.
    pub fn push_inbound(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes);
    }

    /// Decode every frame the session wrote, in order. The outbound stream
    /// contains only well-formed frames, so decoding is deterministic.
    pub fn decoded_outbound(&self, link: &LinkConfig) -> Vec<Vec<u8>> {
        let mut decoder = FrameDecoder::new(link);
        let mut payloads = Vec::new();
        for &b in &self.outbound {
            if let Some(p) = decoder.accept(b) {
                payloads.push(p.to_vec());
            }
        }
        payloads
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockLink {
    type Error = &'static str;

    fn available(&self) -> usize {
        self.inbound.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.inbound.pop_front().ok_or("read past end of inbound")
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.outbound.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

// ── MockRig ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigCall {
    Velocity(f32),
    Thermal(ThermalMode),
    Tick,
}

/// Actuation double. Quantises velocity requests to `velocity_step` to
/// emulate the stepper's achievable-rate correction.
pub struct MockRig {
    pub calls: Vec<RigCall>,
    pub velocity_step: f32,
}

#[allow(dead_code)]
impl MockRig {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            velocity_step: 0.0,
        }
    }

    /// A rig that rounds every request to the nearest multiple of `step`.
    pub fn with_step(step: f32) -> Self {
        Self {
            calls: Vec::new(),
            velocity_step: step,
        }
    }

    /// Every non-tick actuation call, in order.
    pub fn actuations(&self) -> Vec<RigCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, RigCall::Tick))
            .collect()
    }

    pub fn tick_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RigCall::Tick))
            .count()
    }
}

impl Default for MockRig {
    fn default() -> Self {
        Self::new()
    }
}

impl RigPort for MockRig {
    fn apply_velocity(&mut self, rad_per_sec: f32) -> f32 {
        self.calls.push(RigCall::Velocity(rad_per_sec));
        if self.velocity_step > 0.0 {
            (rad_per_sec / self.velocity_step).round() * self.velocity_step
        } else {
            rad_per_sec
        }
    }

    fn apply_thermal(&mut self, mode: ThermalMode) {
        self.calls.push(RigCall::Thermal(mode));
    }

    fn tick(&mut self) {
        self.calls.push(RigCall::Tick);
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Manually advanced microsecond clock. `delay_ms` records the request and
/// moves time forward, wrapping like the hardware counter.
pub struct MockClock {
    pub now_us: u32,
    pub delays_ms: Vec<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self {
            now_us: 0,
            delays_ms: Vec::new(),
        }
    }

    pub fn starting_at(now_us: u32) -> Self {
        Self {
            now_us,
            delays_ms: Vec::new(),
        }
    }

    pub fn advance_us(&mut self, us: u32) {
        self.now_us = self.now_us.wrapping_add(us);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimePort for MockClock {
    fn now_micros(&mut self) -> u32 {
        self.now_us
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.now_us = self.now_us.wrapping_add(ms.wrapping_mul(1000));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<SessionEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &SessionEvent) -> bool {
        self.events.contains(event)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SessionEvent) {
        self.events.push(*event);
    }
}
