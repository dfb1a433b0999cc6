//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the occupancy rules for the two lighting zones:
//! per-zone state, the timeout policy, and the relay commands derived from
//! them.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod controller;
pub mod events;
pub mod ports;
pub mod zone;
