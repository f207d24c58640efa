//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`TelemetrySink`](super::ports::TelemetrySink) port.
//! Adapters on the other side decide what to do with them.

use crate::control::channel::RelayOutput;
use crate::control::oven::OvenMode;
use crate::control::power::PowerBudget;

use super::telemetry::TelemetryFrame;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Relays driven LOW, loop about to start.
    Started,

    /// Periodic plain-data snapshot.
    Telemetry(TelemetryFrame),

    /// A relay output was driven to a new level.
    RelayChanged { relay: RelayOutput, on: bool },

    /// The oven setpoint moved into a different mode band.
    OvenModeChanged { from: OvenMode, to: OvenMode },

    /// Requested load exceeded supply capacity on this tick.
    ConstraintRaised(PowerBudget),

    /// Requested load fits the supply again.
    ConstraintCleared,
}
