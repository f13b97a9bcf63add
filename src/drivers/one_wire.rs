//! Bit-banged 1-Wire master for a single DS18B20 per line.
//!
//! The line is open-drain with an external pull-up: "drive low" configures
//! the line as output and pulls it low, "release" turns it back into an
//! input and lets the pull-up restore the idle level.
//!
//! Every bit slot runs inside a critical section so an interrupt cannot
//! stretch a pulse past its window.  Slot timing is deadline-based
//! (measured from the falling edge), so the time spent in the line calls
//! themselves does not accumulate.
//!
//! One temperature read is two transactions:
//!
//! ```text
//!   reset ─ idle? ─ SKIP ROM ─ CONVERT T ─ poll read slots until 1
//!   reset ─ idle? ─ SKIP ROM ─ READ SCRATCHPAD ─ 72 read slots
//! ```

use log::{debug, warn};

use crate::app::ports::{deadline_reached, ClockPort, LinePort};
use crate::config::{LineId, OneWireTiming};
use crate::error::ProbeError;
use crate::sensors::probe::{self, Scratchpad, SCRATCHPAD_LEN};
use crate::sensors::Reading;

/// Address every device on the line (there is only ever one).
pub const SKIP_ROM: u8 = 0xCC;
/// Start a temperature conversion.
pub const CONVERT_T: u8 = 0x44;
/// Read the 9-byte scratchpad.
pub const READ_SCRATCHPAD: u8 = 0xBE;

/// Protocol master bound to one line of a board.
pub struct OneWire<'a, B> {
    bus: &'a mut B,
    line: LineId,
    timing: OneWireTiming,
}

impl<'a, B: LinePort + ClockPort> OneWire<'a, B> {
    pub fn new(bus: &'a mut B, line: LineId, timing: OneWireTiming) -> Self {
        Self { bus, line, timing }
    }

    fn drive_low(&mut self) {
        self.bus.configure_output(self.line);
        self.bus.set_low(self.line);
    }

    fn release(&mut self) {
        self.bus.configure_input(self.line);
    }

    /// Reset pulse followed by presence detection.
    ///
    /// Always spends the full recovery time before returning, present or
    /// not, so the next transaction starts from a quiet line.
    pub fn reset(&mut self) -> Result<(), ProbeError> {
        let t = self.timing;
        let present = critical_section::with(|_| {
            let start = self.bus.now_us();
            self.drive_low();
            self.bus.wait_until(start.wrapping_add(t.reset_low_us));
            self.release();

            let released = self.bus.now_us();
            self.bus
                .wait_until(released.wrapping_add(t.presence_settle_us));
            let window_end = released.wrapping_add(t.presence_timeout_us);
            let mut present = false;
            loop {
                if !self.bus.read(self.line) {
                    present = true;
                    break;
                }
                if deadline_reached(self.bus.now_us(), window_end) {
                    break;
                }
            }
            self.bus
                .wait_until(released.wrapping_add(t.reset_recovery_us));
            present
        });

        if present {
            Ok(())
        } else {
            Err(ProbeError::NoPresence)
        }
    }

    /// Confirm the line idles high; a low line gets one grace period.
    pub fn ensure_idle(&mut self) -> Result<(), ProbeError> {
        self.release();
        if self.bus.read(self.line) {
            return Ok(());
        }
        let now = self.bus.now_us();
        self.bus
            .wait_until(now.wrapping_add(self.timing.idle_recheck_us));
        if self.bus.read(self.line) {
            Ok(())
        } else {
            Err(ProbeError::BusStuck)
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        let t = self.timing;
        let low = if bit { t.write_one_low_us } else { t.write_zero_low_us };
        critical_section::with(|_| {
            let start = self.bus.now_us();
            self.drive_low();
            self.bus.wait_until(start.wrapping_add(low));
            self.release();
            self.bus.wait_until(start.wrapping_add(t.slot_us));
        });
    }

    pub fn read_bit(&mut self) -> bool {
        let t = self.timing;
        critical_section::with(|_| {
            let start = self.bus.now_us();
            self.drive_low();
            self.bus.wait_until(start.wrapping_add(t.read_low_us));
            self.release();
            self.bus.wait_until(start.wrapping_add(t.read_sample_us));
            let bit = self.bus.read(self.line);
            self.bus.wait_until(start.wrapping_add(t.slot_us));
            bit
        })
    }

    /// Least-significant bit first.
    pub fn write_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.write_bit(byte >> i & 1 != 0);
        }
    }

    /// Least-significant bit first.
    pub fn read_byte(&mut self) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            if self.read_bit() {
                byte |= 1 << i;
            }
        }
        byte
    }

    /// Reset, check the line, and address the probe.
    fn select(&mut self) -> Result<(), ProbeError> {
        self.reset()?;
        self.ensure_idle()?;
        self.write_byte(SKIP_ROM);
        Ok(())
    }

    /// Start a conversion and poll until the probe reports completion.
    pub fn convert(&mut self) -> Result<(), ProbeError> {
        self.select()?;
        self.write_byte(CONVERT_T);

        let limit = self
            .bus
            .now_us()
            .wrapping_add(self.timing.conversion_timeout_ms.saturating_mul(1000));
        while !self.read_bit() {
            if deadline_reached(self.bus.now_us(), limit) {
                return Err(ProbeError::ConversionTimeout);
            }
        }
        Ok(())
    }

    pub fn read_scratchpad(&mut self) -> Result<Scratchpad, ProbeError> {
        self.select()?;
        self.write_byte(READ_SCRATCHPAD);
        let mut pad = [0u8; SCRATCHPAD_LEN];
        for byte in &mut pad {
            *byte = self.read_byte();
        }
        Ok(pad)
    }

    /// Full measurement: convert, fetch, optionally CRC-check, decode.
    pub fn read_temperature(&mut self, verify_crc: bool) -> Reading {
        let result = self.measure(verify_crc);
        if let Err(e) = result {
            warn!("1-wire {}: {}", self.line, e);
        }
        result
    }

    fn measure(&mut self, verify_crc: bool) -> Reading {
        self.convert()?;
        let pad = self.read_scratchpad()?;
        debug!("1-wire {}: scratchpad {:02X?}", self.line, pad);
        if verify_crc && !probe::crc_valid(&pad) {
            return Err(ProbeError::CrcMismatch);
        }
        Ok(probe::decode_temperature(&pad))
    }
}
