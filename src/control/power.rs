//! Power arbitration across grid and battery supply.
//!
//! Every tick, after all relay decisions are made, the arbiter sums the
//! requested load, splits it over the grid (first) and the battery
//! (remainder), and latches an overload flag. That flag is the
//! `power_constraint_active` input of the **next** tick's burner
//! decisions, never the current one.
//!
//! ## Flag lifecycle
//!
//! 1. Requested watts exceed grid + battery capacity.
//! 2. [`PowerArbiter::commit`] sets the latch and reports
//!    [`ConstraintEdge::Raised`].
//! 3. The next tick reads [`PowerArbiter::constraint_active`] before any
//!    burner is scheduled.
//! 4. When the load fits again the latch clears ([`ConstraintEdge::Cleared`]).
//!
//! The arbiter never reduces anybody's draw by itself; unserved power is
//! only flagged.

use serde::{Deserialize, Serialize};

use super::channel::HeaterChannel;
use super::oven::{OvenMode, OvenUnit};
use crate::config::ControlConfig;

/// Recomputed every tick, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerBudget {
    /// Oven contribution plus every on-burner's duty.
    pub total_duty_units: u16,
    pub total_requested_watts: u32,
    pub grid_watts: u32,
    pub battery_watts: u32,
    /// Requested load exceeds what grid + battery can serve.
    pub overload: bool,
}

impl PowerBudget {
    /// Watts actually served.
    pub fn served_watts(&self) -> u32 {
        self.grid_watts + self.battery_watts
    }

    /// Watts requested but not served.
    pub fn unserved_watts(&self) -> u32 {
        self.total_requested_watts.saturating_sub(self.served_watts())
    }
}

/// Split `requested` watts: grid first, battery for the rest, each capped.
pub fn split(requested: u32, max_grid_watts: u32, max_battery_watts: u32) -> (u32, u32) {
    let grid = requested.min(max_grid_watts);
    let battery = (requested - grid).min(max_battery_watts);
    (grid, battery)
}

/// Oven (duty units, watts) for its current relay state.
fn oven_demand(oven: &OvenUnit, config: &ControlConfig) -> (u16, u32) {
    match oven.mode() {
        OvenMode::Broil if oven.is_heating() => (
            u16::from(config.oven_broil_duty_units),
            config.oven_broil_watts,
        ),
        OvenMode::Bake if oven.is_heating() => {
            (u16::from(config.oven_bake_duty_units), config.oven_bake_watts)
        }
        _ => (0, 0),
    }
}

/// Sum the requested load of every zone and split it over the supply.
///
/// A burner whose relay is on is billed at its full duty setting for the
/// tick.
pub fn arbitrate(burners: &[HeaterChannel], oven: &OvenUnit, config: &ControlConfig) -> PowerBudget {
    let (mut duty, mut watts) = oven_demand(oven, config);
    for burner in burners.iter().filter(|b| b.relay_on()) {
        duty += u16::from(burner.duty());
        watts += u32::from(burner.duty()) * config.watts_per_duty_unit;
    }

    let (grid_watts, battery_watts) = split(watts, config.max_grid_watts, config.max_battery_watts);
    PowerBudget {
        total_duty_units: duty,
        total_requested_watts: watts,
        grid_watts,
        battery_watts,
        overload: grid_watts + battery_watts < watts,
    }
}

/// Whether a burner may run under the constraint: the oven has priority
/// and at most one burner runs at a time.
pub fn allow_burner(constraint_active: bool, oven_heating: bool, any_burner_on: bool) -> bool {
    !constraint_active || !(oven_heating || any_burner_on)
}

/// Transition of the constraint latch reported by [`PowerArbiter::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintEdge {
    Raised,
    Cleared,
}

/// Holds the system-wide `power_constraint_active` flag between ticks.
#[derive(Debug, Default)]
pub struct PowerArbiter {
    constraint_active: bool,
    last_budget: PowerBudget,
}

impl PowerArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the overload flag of this tick's budget for the next tick.
    pub fn commit(&mut self, budget: PowerBudget) -> Option<ConstraintEdge> {
        let was = self.constraint_active;
        self.constraint_active = budget.overload;
        self.last_budget = budget;

        match (was, budget.overload) {
            (false, true) => Some(ConstraintEdge::Raised),
            (true, false) => Some(ConstraintEdge::Cleared),
            _ => None,
        }
    }

    /// Flag written by the previous tick's [`commit`](Self::commit).
    pub fn constraint_active(&self) -> bool {
        self.constraint_active
    }

    pub fn last_budget(&self) -> PowerBudget {
        self.last_budget
    }
}
