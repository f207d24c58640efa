//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to            |
//! |------------|---------------------|------------------------|
//! | `hardware` | SensorPort          | ESP32 ADC oneshot      |
//! |            | RelayPort           | Relay GPIOs            |
//! | `log_sink` | TelemetrySink       | Serial log output      |
//! | `time`     | ClockPort           | ESP32 system timer     |

pub mod hardware;
pub mod log_sink;
pub mod time;
