//! Oven setpoint quantisation and the Off / Bake / Broil mode machine.
//!
//! ```text
//!   setpoint == 0            ──▶ OFF    both relays LOW (forced)
//!   0 < setpoint < max       ──▶ BAKE   broil LOW, bake on temperature
//!                                       hysteresis + debounce
//!   setpoint >= max          ──▶ BROIL  both relays HIGH (forced, open loop)
//! ```
//!
//! The mode is a pure function of the setpoint re-derived every tick; only
//! the relay pair (and the bake relay's debounce timestamp) persists.

use serde::{Deserialize, Serialize};

use super::cycle::RelayState;
use super::smoothing::MovingAverage;
use super::{ADC_MAX, map_range};
use crate::config::ControlConfig;

/// Oven operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OvenMode {
    Off,
    Bake,
    Broil,
}

impl OvenMode {
    /// Mode selected by a setpoint. Total over every `u16`.
    pub fn for_setpoint(setpoint_f: u16, max_setpoint_f: u16) -> Self {
        if setpoint_f == 0 {
            Self::Off
        } else if setpoint_f >= max_setpoint_f {
            Self::Broil
        } else {
            Self::Bake
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Bake => "BAKE",
            Self::Broil => "BROIL",
        }
    }
}

/// Quantise a raw potentiometer reading to a setpoint in `step` increments,
/// `0..=max`. Only full scale reaches `max`.
pub fn setpoint_from_pot(raw: u16, step_f: u16, max_f: u16) -> u16 {
    if step_f == 0 {
        return 0;
    }
    let max_steps = i32::from(max_f / step_f);
    let x = i32::from(raw.min(ADC_MAX));
    let step = map_range(x, 0, i32::from(ADC_MAX), 0, max_steps);
    (step as u16 * step_f).min(max_f)
}

/// Conditioned sensor value → cavity temperature (°F), linear over 0–`span`.
pub fn temperature_from_adc(conditioned: u16, span_f: u16) -> u16 {
    let x = i32::from(conditioned.min(ADC_MAX));
    map_range(x, 0, i32::from(ADC_MAX), 0, i32::from(span_f)) as u16
}

/// Relay outputs after one oven update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvenOutputs {
    pub mode: OvenMode,
    pub bake_on: bool,
    pub broil_on: bool,
    pub bake_changed: bool,
    pub broil_changed: bool,
}

/// The single oven: temperature smoothing, current setpoint and relay pair.
#[derive(Debug, Clone)]
pub struct OvenUnit {
    smoother: MovingAverage,
    conditioned: u16,
    temperature_f: u16,
    setpoint_f: u16,
    max_setpoint_f: u16,
    bake: RelayState,
    broil: RelayState,
}

impl OvenUnit {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            smoother: MovingAverage::new(),
            conditioned: 0,
            temperature_f: 0,
            setpoint_f: 0,
            max_setpoint_f: config.oven_max_setpoint_f,
            bake: RelayState::default(),
            broil: RelayState::default(),
        }
    }

    /// Run one tick: quantise the pot, condition the temperature sample and
    /// drive the relay pair from the resulting mode.
    pub fn update(
        &mut self,
        pot_raw: u16,
        temp_raw: u16,
        now_ms: u64,
        config: &ControlConfig,
    ) -> OvenOutputs {
        self.setpoint_f =
            setpoint_from_pot(pot_raw, config.oven_setpoint_step_f, config.oven_max_setpoint_f);
        self.conditioned = self.smoother.update(temp_raw);
        self.temperature_f = temperature_from_adc(self.conditioned, config.oven_sensor_span_f);

        let mode = self.mode();
        let (bake_changed, broil_changed) = match mode {
            OvenMode::Off => (self.bake.force(false), self.broil.force(false)),
            OvenMode::Broil => (self.bake.force(true), self.broil.force(true)),
            OvenMode::Bake => {
                let broil_changed = self.broil.force(false);
                let threshold = i32::from(self.setpoint_f) - i32::from(config.hysteresis_margin);
                let intended = i32::from(self.temperature_f) < threshold;
                let bake_changed = self.bake.request(intended, now_ms, config.debounce_ms);
                (bake_changed, broil_changed)
            }
        };

        OvenOutputs {
            mode,
            bake_on: self.bake.on,
            broil_on: self.broil.on,
            bake_changed,
            broil_changed,
        }
    }

    /// Mode derived from the current setpoint.
    pub fn mode(&self) -> OvenMode {
        OvenMode::for_setpoint(self.setpoint_f, self.max_setpoint_f)
    }

    pub fn setpoint_f(&self) -> u16 {
        self.setpoint_f
    }

    pub fn temperature_f(&self) -> u16 {
        self.temperature_f
    }

    pub fn conditioned(&self) -> u16 {
        self.conditioned
    }

    pub fn bake_on(&self) -> bool {
        self.bake.on
    }

    pub fn broil_on(&self) -> bool {
        self.broil.on
    }

    /// Either element energised.
    pub fn is_heating(&self) -> bool {
        self.bake.on || self.broil.on
    }
}
