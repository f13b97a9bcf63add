//! Control laws.

pub mod heat_pump;
