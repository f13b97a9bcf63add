//! Board access, the 1-Wire master and relay drivers.

pub mod actuators;
#[cfg(target_os = "espidf")]
pub mod board;
pub mod one_wire;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
