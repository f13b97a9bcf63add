//! Relay outputs: heater, pump and the diagnostic status LED.
//!
//! Dumb actuators.  Safety decisions live in the safety monitor and the
//! FSM; these only remember what they last drove so the adapter can
//! report it.
//!
//! Each write sets the level before switching the line to output, so a
//! line coming out of input mode never glitches to the wrong level.

use crate::app::ports::LinePort;
use crate::config::LineId;

/// One active-HIGH digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLine {
    line: LineId,
    on: bool,
}

impl OutputLine {
    pub const fn new(line: LineId) -> Self {
        Self { line, on: false }
    }

    /// Drive the line.  Always touches the hardware, even if unchanged.
    pub fn set(&mut self, bus: &mut impl LinePort, on: bool) {
        if on {
            bus.set_high(self.line);
        } else {
            bus.set_low(self.line);
        }
        bus.configure_output(self.line);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn line(&self) -> LineId {
        self.line
    }
}

/// Status LED with a per-cycle toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLed {
    out: OutputLine,
}

impl StatusLed {
    pub const fn new(line: LineId) -> Self {
        Self {
            out: OutputLine::new(line),
        }
    }

    pub fn set(&mut self, bus: &mut impl LinePort, on: bool) {
        self.out.set(bus, on);
    }

    pub fn toggle(&mut self, bus: &mut impl LinePort) {
        let next = !self.out.is_on();
        self.out.set(bus, next);
    }

    pub fn is_on(&self) -> bool {
        self.out.is_on()
    }
}
