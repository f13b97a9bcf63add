//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters or the simulated board.  All tests run on the
//! host with no real hardware required.

#![cfg(not(target_os = "espidf"))]

mod control_cycle_tests;
mod mock_hw;
mod probe_bus_tests;
