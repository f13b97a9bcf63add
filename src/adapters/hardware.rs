//! Hardware adapter: bridges a board to the domain port traits.
//!
//! Owns the board, the [`SensorHub`] and the relay drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  The board is anything
//! implementing [`LinePort`] + [`ClockPort`]: the ESP32 board on target,
//! the simulated board on the host.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, ClockPort, LinePort, SensorPort};
use crate::config::ControllerConfig;
use crate::drivers::actuators::{OutputLine, StatusLed};
use crate::sensors::{Reading, SensorHub, SensorId};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B> {
    board: B,
    sensors: SensorHub,
    heater: OutputLine,
    pump: OutputLine,
    led: StatusLed,
}

impl<B: LinePort + ClockPort> HardwareAdapter<B> {
    pub fn new(board: B, config: &ControllerConfig) -> Self {
        let sensors = SensorHub::new(config);
        let lines = *sensors.lines();
        Self {
            board,
            sensors,
            heater: OutputLine::new(lines.heater),
            pump: OutputLine::new(lines.pump),
            led: StatusLed::new(lines.status_led),
        }
    }

    pub fn heater_is_on(&self) -> bool {
        self.heater.is_on()
    }

    pub fn pump_is_on(&self) -> bool {
        self.pump.is_on()
    }

    pub fn led_is_on(&self) -> bool {
        self.led.is_on()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<B: LinePort + ClockPort> SensorPort for HardwareAdapter<B> {
    fn read(&mut self, sensor: SensorId) -> Reading {
        self.sensors.read(&mut self.board, sensor)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<B: LinePort + ClockPort> ActuatorPort for HardwareAdapter<B> {
    fn heater_on(&mut self) {
        self.heater.set(&mut self.board, true);
    }

    fn heater_off(&mut self) {
        self.heater.set(&mut self.board, false);
    }

    fn pump_on(&mut self) {
        self.pump.set(&mut self.board, true);
    }

    fn pump_off(&mut self) {
        self.pump.set(&mut self.board, false);
    }

    fn set_status_led(&mut self, on: bool) {
        self.led.set(&mut self.board, on);
    }
}

// ── Polling wait ──────────────────────────────────────────────

impl<B: LinePort + ClockPort> DelayNs for HardwareAdapter<B> {
    fn delay_ns(&mut self, ns: u32) {
        self.board.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.board.delay_ms(ms);
    }
}
