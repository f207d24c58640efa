//! Conditioned ADC value → duty-cycle unit (0–30), with a hysteresis band.

use super::{ADC_MAX, DUTY_MAX, map_range};

/// Rescale a conditioned ADC value onto the 0–30 duty scale.
pub fn raw_duty(conditioned: u16) -> u8 {
    let x = i32::from(conditioned.min(ADC_MAX));
    map_range(x, 0, i32::from(ADC_MAX), 0, i32::from(DUTY_MAX)) as u8
}

/// Adopt `raw` only when it leaves the `previous ± margin` band.
///
/// Inside the band (inclusive of its edges) the previous duty is held,
/// which suppresses chatter from ADC noise near a step boundary.
pub fn apply_hysteresis(raw: u8, previous: u8, margin: u8) -> u8 {
    let (raw, previous, margin) = (i16::from(raw), i16::from(previous), i16::from(margin));
    if raw > previous + margin || raw < previous - margin {
        raw as u8
    } else {
        previous as u8
    }
}

/// Full duty mapping: rescale, then hysteresis against the held duty.
pub fn map_duty(conditioned: u16, previous: u8, margin: u8) -> u8 {
    apply_hysteresis(raw_duty(conditioned), previous, margin)
}

/// Duty unit as a whole percentage, for display.
pub fn duty_percent(duty: u8) -> u8 {
    (u16::from(duty.min(DUTY_MAX)) * 100 / u16::from(DUTY_MAX)) as u8
}
