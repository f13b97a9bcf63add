//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, or format them as status
//! lines for the wireless serial link.

use crate::error::HaltCode;
use crate::fsm::StateId;
use crate::sensors::Reading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Relays forced off, controller about to run its first cycle.
    Started(StateId),

    /// End-of-cycle status.
    Status(StatusReport),

    /// The controller just halted.
    Halted(HaltCode),

    /// Re-announcement on every cycle spent halted.
    HaltRepeated(HaltCode),
}

/// Everything one cycle measured and decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub cycle: u64,
    pub state: StateId,
    pub air: Reading,
    pub soil: [Reading; 4],
    pub soil_sum: Reading,
    pub water: [Reading; 2],
    pub water_sum: Reading,
    pub heater: bool,
    pub pump: bool,
    pub heater_streak: u32,
    /// Halt pending or latched by the end of this cycle.
    pub halt: Option<HaltCode>,
}
