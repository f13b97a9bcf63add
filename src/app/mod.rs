//! Application core: pure domain logic, zero I/O.
//!
//! The controller's rules live here: cycle orchestration, halts and
//! reporting.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod report;
pub mod service;
