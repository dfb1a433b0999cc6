//! Relay drivers, GPIO pins, and hardware initialisation.

pub mod gpio;
pub mod hw_init;
pub mod relay;
