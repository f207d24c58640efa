//! Application core: orchestration of the control math, zero I/O.
//!
//! This module wires the [`control`](crate::control) components into one
//! tick. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;
