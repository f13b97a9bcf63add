//! ESP32-S3 board: raw GPIO and the high-resolution timer.
//!
//! Line numbers are GPIO numbers.  Probe lines rely on their external
//! 4.7 kOhm pull-ups; the internal pull-up stays disabled.
//!
//! The 1-Wire bit slots call these from inside a critical section, so
//! every method here is a plain register access with no locking.

use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_svc::sys::*;
use log::info;

use crate::app::ports::{deadline_reached, ClockPort, LinePort};
use crate::config::{LineId, LineMap};
use crate::error::BoardError;

pub struct EspBoard {
    _private: (),
}

impl EspBoard {
    /// Put every mapped line into its power-on state: probes released,
    /// outputs driven low.
    pub fn new(lines: &LineMap) -> Result<Self, BoardError> {
        let mut board = Self { _private: () };
        for line in [lines.air]
            .iter()
            .chain(&lines.soil)
            .chain(&lines.water)
        {
            board.reset_pin(*line)?;
            board.configure_input(*line);
        }
        for line in [lines.heater, lines.pump, lines.status_led] {
            board.reset_pin(line)?;
            board.set_low(line);
            board.configure_output(line);
        }
        info!("board: {} lines configured", lines.all().len());
        Ok(board)
    }

    fn reset_pin(&mut self, line: LineId) -> Result<(), BoardError> {
        // SAFETY: line numbers come from a validated LineMap; called once
        // per line at boot from the main task.
        let ret = unsafe { gpio_reset_pin(i32::from(line.0)) };
        if ret != ESP_OK as i32 {
            return Err(BoardError::GpioConfigFailed(ret));
        }
        Ok(())
    }
}

impl LinePort for EspBoard {
    fn configure_output(&mut self, line: LineId) {
        // SAFETY: direction register write on a pin reset in `new`.
        unsafe { gpio_set_direction(i32::from(line.0), gpio_mode_t_GPIO_MODE_OUTPUT) };
    }

    fn configure_input(&mut self, line: LineId) {
        // SAFETY: as above.
        unsafe { gpio_set_direction(i32::from(line.0), gpio_mode_t_GPIO_MODE_INPUT) };
    }

    fn set_high(&mut self, line: LineId) {
        // SAFETY: output latch write; harmless while the pin is an input.
        unsafe { gpio_set_level(i32::from(line.0), 1) };
    }

    fn set_low(&mut self, line: LineId) {
        // SAFETY: as above.
        unsafe { gpio_set_level(i32::from(line.0), 0) };
    }

    fn read(&mut self, line: LineId) -> bool {
        // SAFETY: read-only register access.
        (unsafe { gpio_get_level(i32::from(line.0)) }) != 0
    }
}

impl embedded_hal::delay::DelayNs for EspBoard {
    fn delay_ns(&mut self, ns: u32) {
        Ets::delay_us(ns.div_ceil(1000));
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

impl ClockPort for EspBoard {
    fn now_us(&mut self) -> u32 {
        // SAFETY: esp_timer is started by the IDF before app_main.
        (unsafe { esp_timer_get_time() }) as u32
    }

    fn wait_until(&mut self, deadline: u32) {
        while !deadline_reached(self.now_us(), deadline) {}
    }
}
