//! Host-side board simulation.
//!
//! [`SimBoard`] implements the line and clock ports against a virtual
//! microsecond counter.  Waiting jumps the counter forward; every line
//! sample costs one microsecond, so polling loops always make progress.
//!
//! A [`SimProbe`] attached to a line answers the 1-Wire protocol the way a
//! DS18B20 does: it classifies each low pulse by width when the master
//! releases the line, and pulls the line low itself for presence pulses
//! and 0-bits of read slots.

use crate::app::ports::{deadline_reached, ClockPort, LinePort};
use crate::config::LineId;
use crate::drivers::one_wire::{CONVERT_T, READ_SCRATCHPAD, SKIP_ROM};
use crate::sensors::probe::{self, Scratchpad, SCRATCHPAD_LEN};

/// Lines the simulated board exposes.
pub const SIM_LINES: usize = 48;

/// Low pulses at least this long are resets.
const RESET_MIN_US: u32 = 240;
/// Low pulses shorter than this encode a 1 (or open a read slot).
const SHORT_PULSE_MAX_US: u32 = 15;
/// Presence pulse, relative to the master releasing a reset.
const PRESENCE_DELAY_US: u32 = 30;
const PRESENCE_WIDTH_US: u32 = 120;
/// How long the probe holds a 0-bit, from the slot's falling edge.
const READ_ZERO_HOLD_US: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Rom,
    Function,
    Converting,
    Transmit,
}

/// Emulated DS18B20.
#[derive(Debug, Clone)]
pub struct SimProbe {
    /// Temperature in 1/16 °C, as the probe would report it.
    pub raw: i16,
    /// Answers resets with a presence pulse.
    pub present: bool,
    /// Resets still answered before the probe drops off the line.
    pub answers_resets: Option<u32>,
    /// Holds the line low permanently.
    pub stuck_low: bool,
    /// Read slots answered "busy" after each Convert T.
    pub conversion_slots: u32,
    /// Never finishes a conversion.
    pub never_converts: bool,
    /// Flip a bit of the transmitted CRC.
    pub corrupt_crc: bool,
    /// Every byte received, in order.
    pub received: Vec<u8>,

    phase: Phase,
    shift: u8,
    bits: u8,
    busy_left: u32,
    tx: Scratchpad,
    tx_bit: usize,
    hold_low: Option<(u32, u32)>,
}

impl SimProbe {
    /// A healthy probe reading `centi` hundredths of a degree.
    pub fn at_centidegrees(centi: i32) -> Self {
        Self::with_raw(centi_to_raw(centi))
    }

    pub fn with_raw(raw: i16) -> Self {
        Self {
            raw,
            present: true,
            answers_resets: None,
            stuck_low: false,
            conversion_slots: 3,
            never_converts: false,
            corrupt_crc: false,
            received: Vec::new(),
            phase: Phase::Idle,
            shift: 0,
            bits: 0,
            busy_left: 0,
            tx: [0; SCRATCHPAD_LEN],
            tx_bit: 0,
            hold_low: None,
        }
    }

    /// Set the temperature for subsequent conversions.
    pub fn set_centidegrees(&mut self, centi: i32) {
        self.raw = centi_to_raw(centi);
    }

    fn pulls_low(&self, now: u32) -> bool {
        if self.stuck_low {
            return true;
        }
        match self.hold_low {
            Some((from, until)) => {
                deadline_reached(now, from) && !deadline_reached(now, until)
            }
            None => false,
        }
    }

    /// The master released the line after holding it low since `fell`.
    fn on_pulse(&mut self, fell: u32, released: u32) {
        let width = released.wrapping_sub(fell);
        self.hold_low = None;

        if width >= RESET_MIN_US {
            self.shift = 0;
            self.bits = 0;
            if let Some(left) = self.answers_resets.as_mut() {
                if *left == 0 {
                    self.present = false;
                } else {
                    *left -= 1;
                }
            }
            if self.present {
                let from = released.wrapping_add(PRESENCE_DELAY_US);
                self.hold_low = Some((from, from.wrapping_add(PRESENCE_WIDTH_US)));
                self.phase = Phase::Rom;
            } else {
                self.phase = Phase::Idle;
            }
            return;
        }

        let short = width < SHORT_PULSE_MAX_US;
        match self.phase {
            Phase::Idle => {}
            Phase::Rom | Phase::Function => self.receive_bit(short),
            Phase::Converting => {
                if self.never_converts || self.busy_left > 0 {
                    self.busy_left = self.busy_left.saturating_sub(1);
                    self.hold_zero(fell, released);
                }
            }
            Phase::Transmit => {
                let bit = self.tx[self.tx_bit / 8] >> (self.tx_bit % 8) & 1;
                if bit == 0 {
                    self.hold_zero(fell, released);
                }
                self.tx_bit += 1;
                if self.tx_bit == SCRATCHPAD_LEN * 8 {
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    fn hold_zero(&mut self, fell: u32, released: u32) {
        self.hold_low = Some((released, fell.wrapping_add(READ_ZERO_HOLD_US)));
    }

    fn receive_bit(&mut self, one: bool) {
        if one {
            self.shift |= 1 << self.bits;
        }
        self.bits += 1;
        if self.bits < 8 {
            return;
        }
        let byte = self.shift;
        self.shift = 0;
        self.bits = 0;
        self.received.push(byte);

        self.phase = match (self.phase, byte) {
            (Phase::Rom, SKIP_ROM) => Phase::Function,
            (Phase::Function, CONVERT_T) => {
                self.busy_left = self.conversion_slots;
                Phase::Converting
            }
            (Phase::Function, READ_SCRATCHPAD) => {
                self.tx = probe::encode_scratchpad(self.raw);
                if self.corrupt_crc {
                    self.tx[SCRATCHPAD_LEN - 1] ^= 0x01;
                }
                self.tx_bit = 0;
                Phase::Transmit
            }
            _ => Phase::Idle,
        };
    }
}

/// Nearest 1/16 °C step to a centidegree value.
pub fn centi_to_raw(centi: i32) -> i16 {
    let sixteenths = (centi * 16 + centi.signum() * 50) / 100;
    sixteenths.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[derive(Debug, Clone, Default)]
struct SimLine {
    output: bool,
    latch: bool,
    low_since: Option<u32>,
    probe: Option<SimProbe>,
}

impl SimLine {
    fn master_low(&self) -> bool {
        self.output && !self.latch
    }
}

/// Virtual board: lines, probes and a microsecond clock.
pub struct SimBoard {
    now: u32,
    lines: Vec<SimLine>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        Self::with_clock_at(0)
    }

    /// Start the counter at an arbitrary value (wrap testing).
    pub fn with_clock_at(now: u32) -> Self {
        Self {
            now,
            lines: vec![SimLine::default(); SIM_LINES],
        }
    }

    pub fn attach_probe(&mut self, line: LineId, probe: SimProbe) {
        self.lines[line.index()].probe = Some(probe);
    }

    pub fn detach_probe(&mut self, line: LineId) -> Option<SimProbe> {
        self.lines[line.index()].probe.take()
    }

    pub fn probe(&self, line: LineId) -> Option<&SimProbe> {
        self.lines[line.index()].probe.as_ref()
    }

    pub fn probe_mut(&mut self, line: LineId) -> Option<&mut SimProbe> {
        self.lines[line.index()].probe.as_mut()
    }

    /// Driven level of an output line; `false` for inputs.
    pub fn output_level(&self, line: LineId) -> bool {
        let l = &self.lines[line.index()];
        l.output && l.latch
    }

    pub fn is_output(&self, line: LineId) -> bool {
        self.lines[line.index()].output
    }

    fn update(&mut self, line: LineId, change: impl FnOnce(&mut SimLine)) {
        let now = self.now;
        let l = &mut self.lines[line.index()];
        let was_low = l.master_low();
        change(l);
        match (was_low, l.master_low()) {
            (false, true) => l.low_since = Some(now),
            (true, false) => {
                if let (Some(fell), Some(probe)) = (l.low_since.take(), l.probe.as_mut()) {
                    probe.on_pulse(fell, now);
                }
            }
            _ => {}
        }
    }
}

impl LinePort for SimBoard {
    fn configure_output(&mut self, line: LineId) {
        self.update(line, |l| l.output = true);
    }

    fn configure_input(&mut self, line: LineId) {
        self.update(line, |l| l.output = false);
    }

    fn set_high(&mut self, line: LineId) {
        self.update(line, |l| l.latch = true);
    }

    fn set_low(&mut self, line: LineId) {
        self.update(line, |l| l.latch = false);
    }

    fn read(&mut self, line: LineId) -> bool {
        let now = self.now;
        self.now = self.now.wrapping_add(1);
        let l = &self.lines[line.index()];
        if l.master_low() {
            return false;
        }
        // Pulled up unless a probe holds it down.
        !l.probe.as_ref().is_some_and(|p| p.pulls_low(now))
    }
}

impl embedded_hal::delay::DelayNs for SimBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.now = self.now.wrapping_add(ns.div_ceil(1000));
    }
}

impl ClockPort for SimBoard {
    fn now_us(&mut self) -> u32 {
        self.now
    }

    fn wait_until(&mut self, deadline: u32) {
        if !deadline_reached(self.now, deadline) {
            self.now = deadline;
        }
    }
}
