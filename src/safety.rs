//! Safety monitor.
//!
//! Runs alongside the FSM inside each cycle and decides when the
//! controller must halt.  It only reports halt causes; the latched halt
//! itself lives in [`FsmContext::halt`](crate::fsm::context::FsmContext::halt).
//!
//! ## Halt lifecycle
//!
//! 1. A probe fault leaves `BadReading` *pending*.  The cycle that saw it
//!    keeps reading the remaining probes; the halt takes effect at the top
//!    of the next cycle.
//! 2. An air reading at or above the limit halts immediately.
//! 3. A heater-on streak longer than the limit halts immediately.
//!
//! With `safety_halt` disabled nothing is reported; faulted cycles still
//! run with both relays off (see [`FsmContext::decide`](crate::fsm::context::FsmContext::decide)).

use crate::config::ControllerConfig;
use crate::error::HaltCode;
use crate::sensors::{Reading, SensorId};
use log::{error, warn};

pub struct SafetyMonitor {
    enabled: bool,
    max_air_temp: i32,
    max_heater_periods: u32,
    /// Fault seen this cycle, applied next cycle.
    pending: Option<HaltCode>,
}

impl SafetyMonitor {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            enabled: config.safety_halt,
            max_air_temp: config.max_air_temp,
            max_heater_periods: config.max_heater_periods,
            pending: None,
        }
    }

    /// Record one probe result.  A fault leaves a `BadReading` pending.
    pub fn check_reading(&mut self, sensor: SensorId, reading: Reading) {
        let Err(e) = reading else { return };
        if !self.enabled {
            warn!("SAFETY: {} probe fault ({}), halts disabled", sensor.name(), e);
            return;
        }
        if self.pending.is_none() {
            error!("SAFETY: {} probe fault ({}), halt pending", sensor.name(), e);
            self.pending = Some(HaltCode::BadReading);
        }
    }

    /// Hand over the pending halt, if there is one.
    pub fn take_pending(&mut self) -> Option<HaltCode> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Air over-temperature check.  Faulted readings are left to
    /// [`check_reading`](Self::check_reading).
    pub fn check_air(&self, air: Reading) -> Option<HaltCode> {
        match air {
            Ok(t) if self.enabled && t >= self.max_air_temp => {
                error!("SAFETY: air {} >= limit {}", t, self.max_air_temp);
                Some(HaltCode::OverTemperature)
            }
            _ => None,
        }
    }

    /// Heater runaway check against this cycle's streak.
    pub fn check_runaway(&self, heater_streak: u32) -> Option<HaltCode> {
        if self.enabled && heater_streak > self.max_heater_periods {
            error!(
                "SAFETY: heater on for {} consecutive cycles (limit {})",
                heater_streak, self.max_heater_periods
            );
            return Some(HaltCode::HeaterRunaway);
        }
        None
    }
}
