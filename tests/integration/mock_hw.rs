//! Mock adapters for integration tests.
//!
//! Records every relay write so tests can assert on the full command
//! history without touching real GPIO or ADC registers.

use std::cell::Cell;

use rangectl::app::events::AppEvent;
use rangectl::app::ports::{ClockPort, RelayPort, SensorPort, TelemetrySink};
use rangectl::app::telemetry::TelemetryFrame;
use rangectl::control::channel::{AnalogInput, RelayOutput};
use rangectl::error::{ActuatorError, SensorError};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    inputs: [u16; AnalogInput::COUNT],
    failing: [bool; AnalogInput::COUNT],
    levels: [bool; RelayOutput::COUNT],
    pub writes: Vec<(RelayOutput, bool)>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            inputs: [0; AnalogInput::COUNT],
            failing: [false; AnalogInput::COUNT],
            levels: [false; RelayOutput::COUNT],
            writes: Vec::new(),
        }
    }

    pub fn set_input(&mut self, input: AnalogInput, raw: u16) {
        self.inputs[input.index()] = raw;
    }

    pub fn fail_input(&mut self, input: AnalogInput, fail: bool) {
        self.failing[input.index()] = fail;
    }

    /// Pin level after the latest write.
    pub fn level(&self, relay: RelayOutput) -> bool {
        self.levels[relay.index()]
    }

    pub fn writes_for(&self, relay: RelayOutput) -> usize {
        self.writes.iter().filter(|(r, _)| *r == relay).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_analog(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        if self.failing[input.index()] {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(self.inputs[input.index()])
    }

    fn battery_level_percent(&mut self) -> Option<u8> {
        Some(71)
    }
}

impl RelayPort for MockHardware {
    fn set_relay(&mut self, relay: RelayOutput, on: bool) -> Result<(), ActuatorError> {
        self.writes.push((relay, on));
        self.levels[relay.index()] = on;
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(ms: u64) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── EventLog ──────────────────────────────────────────────────

/// Sink that collects every emitted event.
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last_telemetry(&self) -> Option<&TelemetryFrame> {
        self.events.iter().rev().find_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TelemetrySink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
