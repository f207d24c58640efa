//! Control configuration.
//!
//! All tunable parameters for the range. The values are fixed at build
//! time through [`ControlConfig::default`]; there is no runtime reload
//! and nothing is persisted across power cycles.

use serde::{Deserialize, Serialize};

use crate::control::DUTY_MAX;
use crate::error::{Error, Result};

/// What the power arbiter's constraint flag is allowed to do on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConstraintPolicy {
    /// The per-burner allow decision is computed and reported, but relays
    /// follow time-proportioning alone.
    #[default]
    Advisory,
    /// A burner that is not allowed has its intended state forced OFF
    /// (the oven keeps priority, at most one burner runs).
    Enforce,
}

/// Core control configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    // --- Time proportioning ---
    /// Length of one free-running burner cycle (ms).
    pub cycle_length_ms: u32,
    /// Minimum time between two accepted relay transitions (ms).
    pub debounce_ms: u32,
    /// Dead-band applied to duty units and to oven degrees.
    pub hysteresis_margin: u8,

    // --- Power supply ---
    /// Grid capacity (W).
    pub max_grid_watts: u32,
    /// Battery capacity (W).
    pub max_battery_watts: u32,
    /// Burner wattage billed per duty unit while its relay is on.
    pub watts_per_duty_unit: u32,
    /// Reported alongside the total duty; not enforced.
    pub max_total_duty_units: u8,
    /// What the overload flag does to burner decisions.
    pub constraint_policy: ConstraintPolicy,

    // --- Oven ---
    /// Setpoint quantisation step (°F).
    pub oven_setpoint_step_f: u16,
    /// Highest setpoint; reaching it selects broil (°F).
    pub oven_max_setpoint_f: u16,
    /// Temperature at full-scale sensor ADC (°F).
    pub oven_sensor_span_f: u16,
    pub oven_bake_watts: u32,
    pub oven_broil_watts: u32,
    pub oven_bake_duty_units: u8,
    pub oven_broil_duty_units: u8,

    // --- Telemetry ---
    /// Minimum interval between two console telemetry reports (ms).
    pub telemetry_interval_ms: u32,
    /// Battery level shown until a real gauge is fitted (%).
    pub battery_placeholder_pct: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            cycle_length_ms: 30_000,
            debounce_ms: 50,
            hysteresis_margin: 2,

            max_grid_watts: 1_500,
            max_battery_watts: 3_000,
            watts_per_duty_unit: 100,
            max_total_duty_units: 40,
            constraint_policy: ConstraintPolicy::Advisory,

            oven_setpoint_step_f: 25,
            oven_max_setpoint_f: 550,
            oven_sensor_span_f: 550,
            oven_bake_watts: 2_585,
            oven_broil_watts: 3_000,
            oven_bake_duty_units: 30,
            oven_broil_duty_units: 40,

            telemetry_interval_ms: 500,
            battery_placeholder_pct: 71,
        }
    }
}

impl ControlConfig {
    /// Combined grid + battery capacity (W).
    pub fn supply_capacity_watts(&self) -> u32 {
        self.max_grid_watts.saturating_add(self.max_battery_watts)
    }

    /// Reject combinations the control loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.cycle_length_ms == 0 {
            return Err(Error::Config("cycle_length_ms must be non-zero"));
        }
        if self.cycle_length_ms % u32::from(DUTY_MAX) != 0 {
            return Err(Error::Config("cycle_length_ms must be a multiple of the duty scale"));
        }
        if self.debounce_ms >= self.cycle_length_ms {
            return Err(Error::Config("debounce_ms must be shorter than the cycle"));
        }
        if self.oven_setpoint_step_f == 0 {
            return Err(Error::Config("oven_setpoint_step_f must be non-zero"));
        }
        if self.oven_max_setpoint_f == 0
            || self.oven_max_setpoint_f % self.oven_setpoint_step_f != 0
        {
            return Err(Error::Config(
                "oven_max_setpoint_f must be a non-zero multiple of the setpoint step",
            ));
        }
        if self.oven_sensor_span_f == 0 {
            return Err(Error::Config("oven_sensor_span_f must be non-zero"));
        }
        if self.battery_placeholder_pct > 100 {
            return Err(Error::Config("battery_placeholder_pct must be 0-100"));
        }
        if self.telemetry_interval_ms == 0 {
            return Err(Error::Config("telemetry_interval_ms must be non-zero"));
        }
        Ok(())
    }
}
