//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the four relay drivers and reads the ADC through `hw_init`,
//! exposing both through [`SensorPort`] and [`RelayPort`]. On host builds
//! the ADC side falls back to the `hw_init` simulation table.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{RelayPort, SensorPort};
use crate::control::channel::{AnalogInput, RelayOutput};
use crate::drivers::hw_init;
use crate::drivers::relay::RelayDriver;
use crate::error::{ActuatorError, SensorError};

/// Concrete adapter that combines all range hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin> {
    /// Indexed by [`RelayOutput::index`].
    relays: [RelayDriver<P>; RelayOutput::COUNT],
    battery_pct: u8,
}

impl<P: OutputPin> HardwareAdapter<P> {
    /// `relays` in [`RelayOutput::ALL`] order.
    pub fn new(relays: [RelayDriver<P>; RelayOutput::COUNT], battery_pct: u8) -> Self {
        Self {
            relays,
            battery_pct,
        }
    }

    pub fn relay_on(&self, relay: RelayOutput) -> bool {
        self.relays[relay.index()].is_on()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_analog(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        hw_init::adc_read(input)
    }

    /// No fuel gauge is fitted; report the configured placeholder.
    fn battery_level_percent(&mut self) -> Option<u8> {
        Some(self.battery_pct)
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<P: OutputPin> RelayPort for HardwareAdapter<P> {
    fn set_relay(&mut self, relay: RelayOutput, on: bool) -> Result<(), ActuatorError> {
        self.relays[relay.index()].set(on)
    }
}
