//! Heating-element relay driver.
//!
//! One digital output per element, HIGH = coil energised. The driver is a
//! dumb actuator: scheduling, debounce and power gating all happen in the
//! control core before a level is requested here.
//!
//! ## Dual-target design
//!
//! Generic over [`embedded_hal::digital::OutputPin`]: on ESP-IDF the pin
//! is an `esp_idf_hal` `PinDriver`; on host/test any mock pin will do.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take ownership of `pin` and drive it LOW.
    pub fn new(pin: P) -> Result<Self, ActuatorError> {
        let mut relay = Self { pin, on: true };
        relay.set(false)?;
        Ok(relay)
    }

    /// Drive the coil. The cached level only changes once the pin write
    /// succeeds.
    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    /// Last level successfully written.
    pub fn is_on(&self) -> bool {
        self.on
    }
}
