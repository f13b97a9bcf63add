//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the controller's whole mutable state: this cycle's
//! readings, the relay commands derived from them, the heater-on streak
//! and the latched halt.  The [`AppService`](crate::app::service::AppService)
//! owns it; nothing else holds controller state.

use crate::config::ControllerConfig;
use crate::control::heat_pump::{self, HeatPumpDecision};
use crate::error::{HaltCode, ProbeError};
use crate::sensors::{sum_readings, Centidegrees, Reading};

// ---------------------------------------------------------------------------
// Sensor snapshot (written once per cycle by the service)
// ---------------------------------------------------------------------------

/// Every probe's result for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSnapshot {
    pub air: Reading,
    pub soil: [Reading; 4],
    pub water: [Reading; 2],
}

impl Default for SensorSnapshot {
    /// Nothing read yet.
    fn default() -> Self {
        let none = Err(ProbeError::NoPresence);
        Self {
            air: none,
            soil: [none; 4],
            water: [none; 2],
        }
    }
}

impl SensorSnapshot {
    pub fn soil_sum(&self) -> Reading {
        sum_readings(&self.soil)
    }

    pub fn water_sum(&self) -> Reading {
        sum_readings(&self.water)
    }

    /// First fault in read order, if any probe failed this cycle.
    pub fn first_fault(&self) -> Option<ProbeError> {
        core::iter::once(&self.air)
            .chain(&self.soil)
            .chain(&self.water)
            .find_map(|r| r.err())
    }

    /// Soil sum and both water readings, or `None` if any probe failed.
    pub fn control_inputs(&self) -> Option<(Centidegrees, [Centidegrees; 2])> {
        if self.first_fault().is_some() {
            return None;
        }
        let soil_sum = self.soil_sum().ok()?;
        let [a, b] = self.water;
        Some((soil_sum, [a.ok()?, b.ok()?]))
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    pub sensors: SensorSnapshot,

    /// Relay commands applied after the FSM tick.
    pub commands: HeatPumpDecision,

    pub config: ControllerConfig,

    /// Consecutive cycles the heater has been commanded on.
    pub heater_streak: u32,

    /// Latched halt.  Set once, never cleared.
    pub halt: Option<HaltCode>,
}

impl FsmContext {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            sensors: SensorSnapshot::default(),
            commands: HeatPumpDecision::OFF,
            config,
            heater_streak: 0,
            halt: None,
        }
    }

    /// Decide the relays from the current snapshot and update the streak.
    ///
    /// A faulted reading anywhere in the snapshot forces both relays off.
    pub fn decide(&mut self) {
        self.commands = match self.sensors.control_inputs() {
            Some((soil_sum, water)) => heat_pump::decide(soil_sum, water, &self.config),
            None => HeatPumpDecision::OFF,
        };
        self.update_streak();
    }

    /// Both relays off.  Resets the streak.
    pub fn all_off(&mut self) {
        self.commands = HeatPumpDecision::OFF;
        self.update_streak();
    }

    fn update_streak(&mut self) {
        if self.commands.heater {
            self.heater_streak = self.heater_streak.saturating_add(1);
        } else {
            self.heater_streak = 0;
        }
    }
}
