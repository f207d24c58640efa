//! Log-based telemetry sink adapter.
//!
//! Implements [`TelemetrySink`] by writing application events to the
//! ESP-IDF logger (UART / USB-CDC in production). Telemetry frames become
//! one human-readable line per zone plus a JSON dump at `debug` level.
//! The service hands over a frame every tick; the console only prints one
//! per report interval. Edge events are never dropped.

use core::fmt::Write;

use log::{Level, LevelFilter, debug, info, log};

use crate::app::events::AppEvent;
use crate::app::ports::TelemetrySink;
use crate::app::telemetry::{BurnerTelemetry, OvenTelemetry, TelemetryFrame};
use crate::error::Error;

type Line = heapless::String<160>;

/// Adapter that logs [`AppEvent`]s to the serial console.
pub struct LogTelemetrySink {
    ready: bool,
    interval_ms: u32,
    last_report_ms: Option<u64>,
}

impl LogTelemetrySink {
    /// `interval_ms` is the minimum spacing of two printed frames.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            ready: false,
            interval_ms,
            last_report_ms: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Claim the report slot for a frame taken at `uptime_ms`.
    fn report_due(&mut self, uptime_ms: u64) -> bool {
        let due = match self.last_report_ms {
            None => true,
            Some(last) => uptime_ms.saturating_sub(last) >= u64::from(self.interval_ms),
        };
        if due {
            self.last_report_ms = Some(uptime_ms);
        }
        due
    }
}

/// `1650` mV → `"1.650"`.
fn volts(mv: u32) -> heapless::String<8> {
    let mut s = heapless::String::new();
    let _ = write!(s, "{}.{:03}", mv / 1_000, mv % 1_000);
    s
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

pub(crate) fn burner_line(b: &BurnerTelemetry) -> Line {
    let mut s = Line::new();
    let _ = write!(
        s,
        "{}: raw={} avg={} ({} V) duty={}/30 ({}%) relay={}{}",
        b.label,
        b.raw,
        b.conditioned,
        volts(b.millivolts),
        b.duty,
        b.power_percent,
        on_off(b.relay_on),
        if b.allowed { "" } else { " [constrained]" },
    );
    s
}

pub(crate) fn oven_line(o: &OvenTelemetry) -> Line {
    let mut s = Line::new();
    let _ = write!(
        s,
        "Oven: {} set={}F temp={}F ({} V) bake={} broil={}",
        o.mode.name(),
        o.setpoint_f,
        o.temperature_f,
        volts(o.millivolts),
        on_off(o.bake_on),
        on_off(o.broil_on),
    );
    s
}

pub(crate) fn power_line(t: &TelemetryFrame) -> Line {
    let b = &t.budget;
    let mut s = Line::new();
    let _ = write!(
        s,
        "Power: {} W requested, grid={} W battery={} W | duty {}/{}{} | constraint={}",
        b.total_requested_watts,
        b.grid_watts,
        b.battery_watts,
        b.total_duty_units,
        t.max_total_duty_units,
        if t.duty_over_limit() { " (over)" } else { "" },
        on_off(t.constraint_active),
    );
    if let Some(pct) = t.battery_percent {
        let _ = write!(s, " | battery {}%", pct);
    }
    s
}

/// Console line for an edge event. This is the only place constraint and
/// oven mode edges are logged.
pub(crate) fn event_line(event: &AppEvent) -> Option<(Level, Line)> {
    let mut s = Line::new();
    let level = match event {
        AppEvent::Telemetry(_) => return None,
        AppEvent::RelayChanged { relay, on } => {
            let _ = write!(s, "RELAY | {:?} -> {}", relay, on_off(*on));
            Level::Info
        }
        AppEvent::OvenModeChanged { from, to } => {
            let _ = write!(s, "OVEN  | {} -> {}", from.name(), to.name());
            Level::Info
        }
        AppEvent::ConstraintRaised(b) => {
            let _ = write!(
                s,
                "POWER | overload: {} W requested, {} W served, {} W unserved",
                b.total_requested_watts,
                b.served_watts(),
                b.unserved_watts()
            );
            Level::Error
        }
        AppEvent::ConstraintCleared => {
            let _ = write!(s, "POWER | load within capacity");
            Level::Info
        }
        AppEvent::Started => {
            let _ = write!(s, "START | relays low, control loop running");
            Level::Info
        }
    };
    Some((level, s))
}

impl TelemetrySink for LogTelemetrySink {
    /// The console is the operator's only status view, so a silenced
    /// logger counts as a failed sink.
    fn init(&mut self) -> Result<(), Error> {
        if log::max_level() == LevelFilter::Off {
            return Err(Error::Init("serial logger is not installed"));
        }
        self.ready = true;
        info!("telemetry: serial console sink ready");
        Ok(())
    }

    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                if !self.report_due(t.uptime_ms) {
                    return;
                }
                for b in &t.burners {
                    info!("TELEM | {}", burner_line(b));
                }
                info!("TELEM | {}", oven_line(&t.oven));
                info!("TELEM | {}", power_line(t));
                match serde_json::to_string(t) {
                    Ok(json) => debug!("TELEM | {}", json),
                    Err(e) => debug!("TELEM | frame encode failed: {}", e),
                }
            }
            edge => {
                if let Some((level, line)) = event_line(edge) {
                    log!(level, "{}", line);
                }
            }
        }
    }
}
