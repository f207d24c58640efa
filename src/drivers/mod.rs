//! Relay driver and analog input bring-up.

pub mod hw_init;
pub mod relay;
