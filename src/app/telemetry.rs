//! Plain-data telemetry snapshot.
//!
//! Everything an operator display needs, and nothing about how it is
//! drawn. Voltage conversion lives here rather than in `control` since it
//! never feeds a control decision.

use serde::Serialize;

use crate::control::ADC_MAX;
use crate::control::channel::{BURNER_COUNT, HeaterChannel};
use crate::control::duty::duty_percent;
use crate::control::oven::{OvenMode, OvenUnit};
use crate::control::power::PowerBudget;

/// ADC reference in millivolts at full scale.
pub const ADC_REF_MV: u32 = 3_300;

/// Raw 12-bit sample → millivolts at the pin.
pub fn millivolts(adc: u16) -> u32 {
    u32::from(adc.min(ADC_MAX)) * ADC_REF_MV / u32::from(ADC_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurnerTelemetry {
    pub label: &'static str,
    pub raw: u16,
    pub conditioned: u16,
    pub millivolts: u32,
    pub duty: u8,
    pub power_percent: u8,
    pub relay_on: bool,
    /// Outcome of the constraint check (reported even when not enforced).
    pub allowed: bool,
}

impl From<&HeaterChannel> for BurnerTelemetry {
    fn from(ch: &HeaterChannel) -> Self {
        Self {
            label: ch.label(),
            raw: ch.last_raw(),
            conditioned: ch.conditioned(),
            millivolts: millivolts(ch.conditioned()),
            duty: ch.duty(),
            power_percent: duty_percent(ch.duty()),
            relay_on: ch.relay_on(),
            allowed: ch.allowed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OvenTelemetry {
    pub mode: OvenMode,
    pub setpoint_f: u16,
    pub temperature_f: u16,
    pub conditioned: u16,
    pub millivolts: u32,
    pub bake_on: bool,
    pub broil_on: bool,
}

impl From<&OvenUnit> for OvenTelemetry {
    fn from(oven: &OvenUnit) -> Self {
        Self {
            mode: oven.mode(),
            setpoint_f: oven.setpoint_f(),
            temperature_f: oven.temperature_f(),
            conditioned: oven.conditioned(),
            millivolts: millivolts(oven.conditioned()),
            bake_on: oven.bake_on(),
            broil_on: oven.broil_on(),
        }
    }
}

/// A point-in-time snapshot suitable for a display or the serial console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetryFrame {
    pub uptime_ms: u64,
    pub burners: [BurnerTelemetry; BURNER_COUNT],
    pub oven: OvenTelemetry,
    pub budget: PowerBudget,
    pub max_total_duty_units: u8,
    /// Flag the next tick's burner decisions will read.
    pub constraint_active: bool,
    pub battery_percent: Option<u8>,
}

impl TelemetryFrame {
    /// Total duty above the advisory ceiling.
    pub fn duty_over_limit(&self) -> bool {
        self.budget.total_duty_units > u16::from(self.max_total_duty_units)
    }
}
