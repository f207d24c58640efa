//! Burner channel: smoothing window, duty state and relay for one zone.

use serde::{Deserialize, Serialize};

use super::cycle::{RelayState, decide};
use super::duty::map_duty;
use super::smoothing::MovingAverage;
use crate::config::ControlConfig;

/// Number of independently controlled burners.
pub const BURNER_COUNT: usize = 2;

/// Analog inputs the core samples once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalogInput {
    Burner1Pot,
    Burner2Pot,
    OvenPot,
    OvenTemp,
}

impl AnalogInput {
    pub const COUNT: usize = 4;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Burner1Pot,
        Self::Burner2Pot,
        Self::OvenPot,
        Self::OvenTemp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Relay outputs the core drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayOutput {
    Burner1,
    Burner2,
    OvenBake,
    OvenBroil,
}

impl RelayOutput {
    pub const COUNT: usize = 4;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Burner1,
        Self::Burner2,
        Self::OvenBake,
        Self::OvenBroil,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One burner. Created once at startup, mutated once per tick.
#[derive(Debug, Clone)]
pub struct HeaterChannel {
    label: &'static str,
    input: AnalogInput,
    output: RelayOutput,
    smoother: MovingAverage,
    /// Last raw sample that was accepted (re-used if a read fails).
    last_raw: u16,
    conditioned: u16,
    duty: u8,
    /// Duty held before this tick's hysteresis decision.
    previous_duty: u8,
    relay: RelayState,
    /// Outcome of the power-constraint check on the latest tick.
    allowed: bool,
}

impl HeaterChannel {
    pub fn new(label: &'static str, input: AnalogInput, output: RelayOutput) -> Self {
        Self {
            label,
            input,
            output,
            smoother: MovingAverage::new(),
            last_raw: 0,
            conditioned: 0,
            duty: 0,
            previous_duty: 0,
            relay: RelayState::default(),
            allowed: true,
        }
    }

    /// The two burners of the range, in panel order.
    pub fn burners() -> [Self; BURNER_COUNT] {
        [
            Self::new("Burner 1", AnalogInput::Burner1Pot, RelayOutput::Burner1),
            Self::new("Burner 2", AnalogInput::Burner2Pot, RelayOutput::Burner2),
        ]
    }

    /// Condition `raw`, re-derive the duty and schedule the relay.
    ///
    /// `allowed` is the power-constraint decision; `enforce` says whether it
    /// may override time-proportioning. Returns `true` if the relay changed.
    pub fn update(
        &mut self,
        raw: u16,
        position_ms: u32,
        now_ms: u64,
        allowed: bool,
        enforce: bool,
        config: &ControlConfig,
    ) -> bool {
        self.last_raw = raw;
        self.conditioned = self.smoother.update(raw);
        self.previous_duty = self.duty;
        self.duty = map_duty(self.conditioned, self.previous_duty, config.hysteresis_margin);
        self.allowed = allowed;

        // An enforced denial schedules the burner like duty 0.
        let duty = if allowed || !enforce { self.duty } else { 0 };
        let (on, changed_at) = decide(
            duty,
            position_ms,
            config.cycle_length_ms,
            self.relay,
            now_ms,
            config.debounce_ms,
        );
        match changed_at {
            Some(at) => {
                self.relay = RelayState {
                    on,
                    last_change_ms: at,
                };
                true
            }
            None => false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn input(&self) -> AnalogInput {
        self.input
    }

    pub fn output(&self) -> RelayOutput {
        self.output
    }

    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    pub fn conditioned(&self) -> u16 {
        self.conditioned
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn previous_duty(&self) -> u8 {
        self.previous_duty
    }

    pub fn relay_on(&self) -> bool {
        self.relay.on
    }

    pub fn last_change_ms(&self) -> u64 {
        self.relay.last_change_ms
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }
}
