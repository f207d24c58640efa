//! Control core: signal conditioning, duty derivation, time-proportioning,
//! the oven mode machine and power arbitration.
//!
//! ```text
//!  raw ADC ──▶ MovingAverage ──▶ map_duty ──▶ decide_relay ──┐
//!  (burners)                     (hysteresis)  (cycle+debounce)│
//!                                                              ▼
//!  oven pot ──▶ setpoint ──┐                            PowerArbiter
//!  oven temp ─▶ MovingAverage ─▶ OvenUnit::update ──────────▶  │
//!                                                              │
//!            constraint flag (read on the *next* tick) ◀───────┘
//! ```
//!
//! Everything here is synchronous, allocation-free and infallible. Time is
//! a single `now_ms` read per tick passed in by the caller.

pub mod channel;
pub mod cycle;
pub mod duty;
pub mod oven;
pub mod power;
pub mod smoothing;

/// Number of raw samples in every moving-average window.
pub const SMOOTHING_SAMPLES: usize = 10;

/// Full-scale duty-cycle unit (100 % of a cycle).
pub const DUTY_MAX: u8 = 30;

/// Full-scale 12-bit ADC reading (3.3 V).
pub const ADC_MAX: u16 = 4095;

/// Linear integer rescale with truncating division, the classic
/// `map(x, in_lo, in_hi, out_lo, out_hi)`.
///
/// `in_lo == in_hi` yields `out_lo`.
pub const fn map_range(x: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    if in_hi == in_lo {
        return out_lo;
    }
    (x - in_lo) * (out_hi - out_lo) / (in_hi - in_lo) + out_lo
}
