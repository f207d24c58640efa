//! Range controller firmware: main entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                    │
//! │                                                           │
//! │  HardwareAdapter        LogTelemetrySink   Esp32Time      │
//! │  (Sensor + Relay)       (TelemetrySink)    (ClockPort)    │
//! │                                                           │
//! │  ─────────────── Port Trait Boundary ───────────────      │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────┐      │
//! │  │         ControlService (pure logic)             │      │
//! │  │  burners · oven · power arbiter                 │      │
//! │  └─────────────────────────────────────────────────┘      │
//! └───────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use log::{error, info};

use rangectl::adapters::hardware::HardwareAdapter;
use rangectl::adapters::log_sink::LogTelemetrySink;
use rangectl::adapters::time::Esp32TimeAdapter;
use rangectl::app::ports::TelemetrySink;
use rangectl::app::service::ControlService;
use rangectl::config::ControlConfig;
use rangectl::control::channel::RelayOutput;
use rangectl::drivers::hw_init;
use rangectl::drivers::relay::RelayDriver;
use rangectl::pins;

/// Idle time between control ticks; keeps the FreeRTOS idle task fed.
const TICK_MS: u32 = 10;
/// Startup banner hold time.
const SPLASH_MS: u32 = 1_500;

type RelayPin = PinDriver<'static, AnyOutputPin, Output>;

fn relay_driver(relay: RelayOutput) -> Result<RelayDriver<RelayPin>> {
    // SAFETY: each relay GPIO is claimed exactly once, here, and no
    // other driver in the firmware touches it.
    let pin = unsafe { AnyOutputPin::new(pins::relay_gpio(relay)) };
    let driver = PinDriver::output(pin)?;
    Ok(RelayDriver::new(driver).map_err(rangectl::error::Error::from)?)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Eikos Tech range v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = ControlConfig::default();
    config.validate()?;

    // ── 2. Relays LOW before anything else can fail ───────────
    let [b1, b2, bake, broil] = RelayOutput::ALL;
    let relays = [
        relay_driver(b1)?,
        relay_driver(b2)?,
        relay_driver(bake)?,
        relay_driver(broil)?,
    ];

    // ── 3. Operator status ────────────────────────────────────
    let mut sink = LogTelemetrySink::new(config.telemetry_interval_ms);
    if let Err(e) = sink.init() {
        // No status, no heat.
        error!("Telemetry sink init failed: {}, halting", e);
        loop {
            FreeRtos::delay_ms(1_000);
        }
    }

    // ── 4. Analog inputs ──────────────────────────────────────
    hw_init::init_adc()?;

    let mut hw = HardwareAdapter::new(relays, config.battery_placeholder_pct);
    let clock = Esp32TimeAdapter::new();
    let mut service = ControlService::new(config);
    service.start(&mut hw, &mut sink);
    FreeRtos::delay_ms(SPLASH_MS);

    // ── 5. Control loop ───────────────────────────────────────
    info!("System ready. Entering control loop.");
    loop {
        service.tick(&mut hw, &clock, &mut sink);
        FreeRtos::delay_ms(TICK_MS);
    }
}
