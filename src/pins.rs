//! GPIO / peripheral pin assignments for the range control board (ESP32).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

use crate::control::channel::{AnalogInput, RelayOutput};

// ---------------------------------------------------------------------------
// Burners
// ---------------------------------------------------------------------------

/// Burner 1 potentiometer (ADC1_CH6).
pub const BURNER_1_POT_GPIO: i32 = 34;
/// Burner 1 relay coil driver. HIGH = element energised.
pub const BURNER_1_RELAY_GPIO: i32 = 12;

/// Burner 2 potentiometer (ADC1_CH7).
pub const BURNER_2_POT_GPIO: i32 = 35;
/// Burner 2 relay coil driver.
pub const BURNER_2_RELAY_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Oven
// ---------------------------------------------------------------------------

/// Oven setpoint potentiometer (ADC1_CH4).
pub const OVEN_POT_GPIO: i32 = 32;
/// Oven cavity temperature sensor (ADC2_CH4).
pub const OVEN_TEMP_GPIO: i32 = 13;
/// Lower (bake) element relay.
pub const OVEN_BAKE_RELAY_GPIO: i32 = 26;
/// Upper (broil) element relay.
pub const OVEN_BROIL_RELAY_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub const fn analog_gpio(input: AnalogInput) -> i32 {
    match input {
        AnalogInput::Burner1Pot => BURNER_1_POT_GPIO,
        AnalogInput::Burner2Pot => BURNER_2_POT_GPIO,
        AnalogInput::OvenPot => OVEN_POT_GPIO,
        AnalogInput::OvenTemp => OVEN_TEMP_GPIO,
    }
}

pub const fn relay_gpio(relay: RelayOutput) -> i32 {
    match relay {
        RelayOutput::Burner1 => BURNER_1_RELAY_GPIO,
        RelayOutput::Burner2 => BURNER_2_RELAY_GPIO,
        RelayOutput::OvenBake => OVEN_BAKE_RELAY_GPIO,
        RelayOutput::OvenBroil => OVEN_BROIL_RELAY_GPIO,
    }
}
