//! One-shot ADC bring-up and raw analog reads.
//!
//! Configures both ADC oneshot units using raw ESP-IDF sys calls. Called
//! once from `main()` before the control loop starts.
//!
//! On host builds the reads come from an in-memory simulation table that
//! tests and the simulator can drive with [`sim_set_analog`].

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

use crate::control::channel::AnalogInput;
use crate::error::SensorError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcUnitFailed { unit: u8, rc: i32 },
    AdcChannelFailed { unit: u8, channel: u32, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcUnitFailed { unit, rc } => write!(f, "ADC{} unit init failed (rc={})", unit, rc),
            Self::AdcChannelFailed { unit, channel, rc } => {
                write!(f, "ADC{} CH{} config failed (rc={})", unit, channel, rc)
            }
        }
    }
}

impl core::error::Error for HwInitError {}

// ── Channel map ───────────────────────────────────────────────

/// Oneshot unit (1 or 2) and channel number behind each analog input.
pub const fn adc_channel(input: AnalogInput) -> (u8, u32) {
    match input {
        AnalogInput::Burner1Pot => (1, 6), // GPIO34
        AnalogInput::Burner2Pot => (1, 7), // GPIO35
        AnalogInput::OvenPot => (1, 4),    // GPIO32
        AnalogInput::OvenTemp => (2, 4),   // GPIO13
    }
}

// ── ESP-IDF backend ───────────────────────────────────────────

#[cfg(feature = "espidf")]
use log::info;

#[cfg(feature = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();
#[cfg(feature = "espidf")]
static mut ADC2_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// control-loop read path. `init_adc()` completes before the loop starts.
#[cfg(feature = "espidf")]
unsafe fn unit_handle(unit: u8) -> adc_oneshot_unit_handle_t {
    unsafe {
        if unit == 1 { ADC1_HANDLE } else { ADC2_HANDLE }
    }
}

#[cfg(feature = "espidf")]
pub fn init_adc() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; the handle
    // statics are only written here.
    unsafe {
        new_unit(1, adc_unit_t_ADC_UNIT_1, &raw mut ADC1_HANDLE)?;
        new_unit(2, adc_unit_t_ADC_UNIT_2, &raw mut ADC2_HANDLE)?;

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        for input in AnalogInput::ALL {
            let (unit, channel) = adc_channel(input);
            let rc = adc_oneshot_config_channel(unit_handle(unit), channel, &chan_cfg);
            if rc != ESP_OK as i32 {
                return Err(HwInitError::AdcChannelFailed { unit, channel, rc });
            }
            info!(
                "hw_init: {:?} on GPIO{} (ADC{} CH{})",
                input,
                crate::pins::analog_gpio(input),
                unit,
                channel
            );
        }
    }
    Ok(())
}

#[cfg(feature = "espidf")]
unsafe fn new_unit(
    unit: u8,
    unit_id: adc_unit_t,
    handle: *mut adc_oneshot_unit_handle_t,
) -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let rc = unsafe { adc_oneshot_new_unit(&init_cfg, handle) };
    if rc != ESP_OK as i32 {
        return Err(HwInitError::AdcUnitFailed { unit, rc });
    }
    Ok(())
}

/// One 12-bit conversion of `input`.
#[cfg(feature = "espidf")]
pub fn adc_read(input: AnalogInput) -> Result<u16, SensorError> {
    let (unit, channel) = adc_channel(input);
    // SAFETY: handle contract above; single-threaded loop access only.
    let handle = unsafe { unit_handle(unit) };
    if handle.is_null() {
        return Err(SensorError::NotConfigured);
    }
    let mut raw: i32 = 0;
    let rc = unsafe { adc_oneshot_read(handle, channel, &mut raw) };
    if rc != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.clamp(0, i32::from(crate::control::ADC_MAX)) as u16)
}

// ── Simulation backend ────────────────────────────────────────

#[cfg(not(feature = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16};

    pub(super) static ANALOG: [AtomicU16; 4] = [const { AtomicU16::new(0) }; 4];
    pub(super) static FAIL_READS: AtomicBool = AtomicBool::new(false);
}

#[cfg(not(feature = "espidf"))]
pub fn init_adc() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ADC init skipped");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn adc_read(input: AnalogInput) -> Result<u16, SensorError> {
    use core::sync::atomic::Ordering;
    if sim::FAIL_READS.load(Ordering::Relaxed) {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(sim::ANALOG[input.index()].load(Ordering::Relaxed))
}

/// Set the simulated raw reading of `input` (host only).
#[cfg(not(feature = "espidf"))]
pub fn sim_set_analog(input: AnalogInput, raw: u16) {
    sim::ANALOG[input.index()].store(raw.min(crate::control::ADC_MAX), core::sync::atomic::Ordering::Relaxed);
}

/// Make every simulated read fail (host only).
#[cfg(not(feature = "espidf"))]
pub fn sim_fail_reads(fail: bool) {
    sim::FAIL_READS.store(fail, core::sync::atomic::Ordering::Relaxed);
}
