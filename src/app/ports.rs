//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (ADC inputs, relay outputs, clock, telemetry sink)
//! implement these traits. The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the control math never touches hardware
//! directly.

use crate::control::channel::{AnalogInput, RelayOutput};
use crate::error::{ActuatorError, Error, SensorError};

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples analog inputs through this.
pub trait SensorPort {
    /// One raw 12-bit sample (0–4095, 0–3.3 V) of `input`.
    fn read_analog(&mut self, input: AnalogInput) -> Result<u16, SensorError>;

    /// Battery state of charge, if the board can measure it.
    fn battery_level_percent(&mut self) -> Option<u8> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port. Called only when a relay's logical state changes.
pub trait RelayPort {
    /// Drive `relay` HIGH (`true`) or LOW. Must be idempotent.
    fn set_relay(&mut self, relay: RelayOutput, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock, read once per tick.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Telemetry sink (driven adapter: domain → display / serial)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide how they are rendered (serial console, OLED, etc.).
pub trait TelemetrySink {
    /// Bring the sink up. Failure here is fatal: heating elements must not
    /// run without operator-visible status.
    fn init(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn emit(&mut self, event: &AppEvent);
}
