//! Mock hardware adapter for integration tests.
//!
//! Serves scripted readings and records every sensor read and actuator
//! call so tests can assert on the full history without a board.

use std::collections::HashMap;

use embedded_hal::delay::DelayNs;
use vegimeter::app::events::AppEvent;
use vegimeter::app::ports::{ActuatorPort, EventSink, SensorPort};
use vegimeter::error::{HaltCode, ProbeError};
use vegimeter::sensors::{Reading, SensorId};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Heater(bool),
    Pump(bool),
    Led(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    readings: HashMap<SensorId, Reading>,
    pub reads: Vec<SensorId>,
    pub calls: Vec<ActuatorCall>,
    pub slept_ms: u64,
}

#[allow(dead_code)]
impl MockHardware {
    /// Every probe present: one air value, one soil value for all four
    /// soil probes, one water value for both water probes.
    pub fn uniform(air: i32, soil: i32, water: i32) -> Self {
        let mut hw = Self {
            readings: HashMap::new(),
            reads: Vec::new(),
            calls: Vec::new(),
            slept_ms: 0,
        };
        hw.set(SensorId::Air, Ok(air));
        for id in SensorId::SOIL {
            hw.set(id, Ok(soil));
        }
        for id in SensorId::WATER {
            hw.set(id, Ok(water));
        }
        hw
    }

    pub fn set(&mut self, id: SensorId, reading: Reading) {
        self.readings.insert(id, reading);
    }

    pub fn set_water(&mut self, a: i32, b: i32) {
        self.set(SensorId::WaterA, Ok(a));
        self.set(SensorId::WaterB, Ok(b));
    }

    pub fn set_soil(&mut self, v: [i32; 4]) {
        for (id, t) in SensorId::SOIL.into_iter().zip(v) {
            self.set(id, Ok(t));
        }
    }

    pub fn heater_is_on(&self) -> bool {
        self.last(|c| match c {
            ActuatorCall::Heater(on) => Some(on),
            _ => None,
        })
    }

    pub fn pump_is_on(&self) -> bool {
        self.last(|c| match c {
            ActuatorCall::Pump(on) => Some(on),
            _ => None,
        })
    }

    pub fn led_is_on(&self) -> bool {
        self.last(|c| match c {
            ActuatorCall::Led(on) => Some(on),
            _ => None,
        })
    }

    /// Forget recorded reads and calls.
    pub fn clear_history(&mut self) {
        self.reads.clear();
        self.calls.clear();
    }

    fn last(&self, f: impl Fn(ActuatorCall) -> Option<bool>) -> bool {
        self.calls.iter().rev().find_map(|c| f(*c)).unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self, sensor: SensorId) -> Reading {
        self.reads.push(sensor);
        self.readings
            .get(&sensor)
            .copied()
            .unwrap_or(Err(ProbeError::NoPresence))
    }
}

impl ActuatorPort for MockHardware {
    fn heater_on(&mut self) {
        self.calls.push(ActuatorCall::Heater(true));
    }

    fn heater_off(&mut self) {
        self.calls.push(ActuatorCall::Heater(false));
    }

    fn pump_on(&mut self) {
        self.calls.push(ActuatorCall::Pump(true));
    }

    fn pump_off(&mut self) {
        self.calls.push(ActuatorCall::Pump(false));
    }

    fn set_status_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Led(on));
    }
}

impl DelayNs for MockHardware {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms += u64::from(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn halts(&self) -> Vec<HaltCode> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Halted(c) | AppEvent::HaltRepeated(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Status(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
