//! Time-proportioning relay scheduler (slow software PWM) and relay debounce.
//!
//! A burner at duty `d` is held ON for the first `d/30` of a fixed
//! free-running cycle and OFF for the remainder. The cycle restarts at the
//! tick where its length has elapsed; it is not aligned to wall-clock
//! boundaries.

use super::DUTY_MAX;

// ---------------------------------------------------------------------------
// Cycle clock
// ---------------------------------------------------------------------------

/// Free-running cycle shared by every burner.
#[derive(Debug, Clone, Copy)]
pub struct CycleClock {
    start_ms: u64,
    length_ms: u32,
}

impl CycleClock {
    pub fn new(length_ms: u32) -> Self {
        Self {
            start_ms: 0,
            length_ms,
        }
    }

    /// Position inside the current cycle, restarting the cycle when a full
    /// length has elapsed. Always in `0..length_ms`.
    pub fn position(&mut self, now_ms: u64) -> u32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= u64::from(self.length_ms) {
            self.start_ms = now_ms;
            return 0;
        }
        elapsed as u32
    }

    pub fn length_ms(&self) -> u32 {
        self.length_ms
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }
}

/// Milliseconds per cycle a relay at `duty` should be ON.
pub fn on_window_ms(duty: u8, cycle_length_ms: u32) -> u32 {
    u32::from(duty.min(DUTY_MAX)) * (cycle_length_ms / u32::from(DUTY_MAX))
}

/// Intended relay state at `position_ms` into the cycle.
pub fn intended_on(duty: u8, position_ms: u32, cycle_length_ms: u32) -> bool {
    position_ms < on_window_ms(duty, cycle_length_ms)
}

// ---------------------------------------------------------------------------
// Relay state + debounce
// ---------------------------------------------------------------------------

/// Logical relay output with the time of its last accepted transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayState {
    pub on: bool,
    pub last_change_ms: u64,
}

impl RelayState {
    /// Move towards `intended`, honouring the debounce interval.
    /// Returns `true` if the output changed.
    pub fn request(&mut self, intended: bool, now_ms: u64, debounce_ms: u32) -> bool {
        match debounce(intended, *self, now_ms, debounce_ms) {
            Some(at) => {
                self.on = intended;
                self.last_change_ms = at;
                true
            }
            None => false,
        }
    }

    /// Set the output unconditionally. The debounce timestamp is left alone.
    /// Returns `true` if the output changed.
    pub fn force(&mut self, on: bool) -> bool {
        let changed = self.on != on;
        self.on = on;
        changed
    }
}

/// `Some(now_ms)` when a transition to `intended` is due, `None` otherwise.
///
/// Transitions need strictly more than `debounce_ms` since the previous one.
fn debounce(intended: bool, current: RelayState, now_ms: u64, debounce_ms: u32) -> Option<u64> {
    let settled = now_ms.saturating_sub(current.last_change_ms) > u64::from(debounce_ms);
    (intended != current.on && settled).then_some(now_ms)
}

/// One scheduling decision for a burner relay.
///
/// Returns the new relay state and, if a transition was accepted, its
/// timestamp.
pub fn decide(
    duty: u8,
    position_ms: u32,
    cycle_length_ms: u32,
    current: RelayState,
    now_ms: u64,
    debounce_ms: u32,
) -> (bool, Option<u64>) {
    let intended = intended_on(duty, position_ms, cycle_length_ms);
    match debounce(intended, current, now_ms, debounce_ms) {
        Some(at) => (intended, Some(at)),
        None => (current.on, None),
    }
}
