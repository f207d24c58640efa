//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns both burners, the oven and the power arbiter.
//! It exposes a hardware-agnostic API; all I/O flows through port traits
//! injected at call sites, so the whole loop is testable with mock
//! adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ TelemetrySink
//!                 │       ControlService        │
//!   RelayPort ◀── │ burners · oven · arbiter    │ ◀── ClockPort
//!                 └─────────────────────────────┘
//! ```
//!
//! ## Tick ordering
//!
//! 1. Read the clock once; every comparison in the tick uses that value.
//! 2. Burners, in panel order, gated by the *previous* tick's constraint.
//! 3. Oven.
//! 4. Arbitrate and latch the constraint for the next tick.
//! 5. Telemetry frame, every tick. Rate limiting is the sink's business.

use log::{info, warn};

use crate::config::{ConstraintPolicy, ControlConfig};
use crate::control::channel::{AnalogInput, BURNER_COUNT, HeaterChannel, RelayOutput};
use crate::control::cycle::CycleClock;
use crate::control::oven::OvenUnit;
use crate::control::power::{ConstraintEdge, PowerArbiter, PowerBudget, allow_burner, arbitrate};

use super::events::AppEvent;
use super::ports::{ClockPort, RelayPort, SensorPort, TelemetrySink};
use super::telemetry::{BurnerTelemetry, OvenTelemetry, TelemetryFrame};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates all domain logic.
pub struct ControlService {
    config: ControlConfig,
    burners: [HeaterChannel; BURNER_COUNT],
    oven: OvenUnit,
    cycle: CycleClock,
    arbiter: PowerArbiter,
    /// Last good sample per input, re-used when a read fails.
    held_samples: [u16; AnalogInput::COUNT],
    last_now_ms: u64,
    tick_count: u64,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Relays are not touched; call [`start`](Self::start) next.
    pub fn new(config: ControlConfig) -> Self {
        Self {
            burners: HeaterChannel::burners(),
            oven: OvenUnit::new(&config),
            cycle: CycleClock::new(config.cycle_length_ms),
            arbiter: PowerArbiter::new(),
            held_samples: [0; AnalogInput::COUNT],
            last_now_ms: 0,
            tick_count: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every relay LOW and announce the start.
    pub fn start(&mut self, hw: &mut impl RelayPort, sink: &mut impl TelemetrySink) {
        for relay in RelayOutput::ALL {
            if let Err(e) = hw.set_relay(relay, false) {
                warn!("{relay:?}: could not drive LOW at startup: {e}");
            }
        }
        sink.emit(&AppEvent::Started);
        info!(
            "ControlService started (cycle={} ms, policy={:?})",
            self.config.cycle_length_ms, self.config.constraint_policy
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control tick: sample → burners → oven → arbitrate →
    /// telemetry.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`RelayPort`], which avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + RelayPort),
        clock: &impl ClockPort,
        sink: &mut impl TelemetrySink,
    ) -> PowerBudget {
        let now_ms = clock.now_ms();
        self.last_now_ms = now_ms;
        self.tick_count += 1;
        let position_ms = self.cycle.position(now_ms);

        // 1. Burners, gated by last tick's flag.
        let constraint = self.arbiter.constraint_active();
        let oven_heating = self.oven.is_heating();
        let enforce = self.config.constraint_policy == ConstraintPolicy::Enforce;

        for i in 0..BURNER_COUNT {
            let input = self.burners[i].input();
            let raw = self.sample(hw, input);
            let earlier_on = self.burners[..i].iter().any(HeaterChannel::relay_on);
            let allowed = allow_burner(constraint, oven_heating, earlier_on);

            let burner = &mut self.burners[i];
            if burner.update(raw, position_ms, now_ms, allowed, enforce, &self.config) {
                Self::drive(hw, burner.output(), burner.relay_on(), sink);
            }
        }

        // 2. Oven. The pot is used unsmoothed.
        let pot_raw = self.sample(hw, AnalogInput::OvenPot);
        let temp_raw = self.sample(hw, AnalogInput::OvenTemp);
        let prev_mode = self.oven.mode();
        let out = self.oven.update(pot_raw, temp_raw, now_ms, &self.config);

        if out.mode != prev_mode {
            sink.emit(&AppEvent::OvenModeChanged {
                from: prev_mode,
                to: out.mode,
            });
        }
        if out.bake_changed {
            Self::drive(hw, RelayOutput::OvenBake, out.bake_on, sink);
        }
        if out.broil_changed {
            Self::drive(hw, RelayOutput::OvenBroil, out.broil_on, sink);
        }

        // 3. Arbitration, consumed next tick.
        let budget = arbitrate(&self.burners, &self.oven, &self.config);
        match self.arbiter.commit(budget) {
            Some(ConstraintEdge::Raised) => sink.emit(&AppEvent::ConstraintRaised(budget)),
            Some(ConstraintEdge::Cleared) => sink.emit(&AppEvent::ConstraintCleared),
            None => {}
        }

        // 4. Telemetry.
        let battery = hw.battery_level_percent();
        sink.emit(&AppEvent::Telemetry(self.build_telemetry(battery)));

        budget
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the state left by the latest tick.
    pub fn build_telemetry(&self, battery_percent: Option<u8>) -> TelemetryFrame {
        TelemetryFrame {
            uptime_ms: self.last_now_ms,
            burners: [
                BurnerTelemetry::from(&self.burners[0]),
                BurnerTelemetry::from(&self.burners[1]),
            ],
            oven: OvenTelemetry::from(&self.oven),
            budget: self.arbiter.last_budget(),
            max_total_duty_units: self.config.max_total_duty_units,
            constraint_active: self.arbiter.constraint_active(),
            battery_percent,
        }
    }

    pub fn burners(&self) -> &[HeaterChannel; BURNER_COUNT] {
        &self.burners
    }

    pub fn oven(&self) -> &OvenUnit {
        &self.oven
    }

    /// Flag the next tick's burner decisions will read.
    pub fn constraint_active(&self) -> bool {
        self.arbiter.constraint_active()
    }

    pub fn last_budget(&self) -> PowerBudget {
        self.arbiter.last_budget()
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Read `input`, falling back to the previous sample on failure.
    fn sample(&mut self, hw: &mut impl SensorPort, input: AnalogInput) -> u16 {
        let slot = &mut self.held_samples[input.index()];
        match hw.read_analog(input) {
            Ok(raw) => {
                *slot = raw;
                raw
            }
            Err(e) => {
                warn!("{input:?}: {e}, holding {}", *slot);
                *slot
            }
        }
    }

    /// Push a logical relay change to the pin.
    fn drive(
        hw: &mut impl RelayPort,
        relay: RelayOutput,
        on: bool,
        sink: &mut impl TelemetrySink,
    ) {
        if let Err(e) = hw.set_relay(relay, on) {
            warn!("{relay:?}: write failed: {e}");
        }
        sink.emit(&AppEvent::RelayChanged { relay, on });
    }
}
