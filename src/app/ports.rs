//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Board (LinePort + ClockPort) ──▶ OneWire ──▶ SensorPort ──▶ AppService
//!                                                ActuatorPort ◀──┘    │
//!                                                     EventSink ◀─────┘
//! ```
//!
//! Boards implement [`LinePort`] and [`ClockPort`]; the
//! [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter) builds
//! the sensor and actuator ports on top of them.  The
//! [`AppService`](super::service::AppService) only ever sees the upper
//! ports, so the control logic runs unchanged against mocks.

use embedded_hal::delay::DelayNs;

use crate::config::LineId;
use crate::error::SinkError;
use crate::sensors::{Reading, SensorId};

// ───────────────────────────────────────────────────────────────
// Digital line driver (board → protocol layer)
// ───────────────────────────────────────────────────────────────

/// Direction and level control of single digital lines.
///
/// Operations on a correctly configured line always succeed.  Reading a
/// line configured as output is undefined; callers must not do it.
pub trait LinePort {
    fn configure_output(&mut self, line: LineId);
    fn configure_input(&mut self, line: LineId);
    fn set_high(&mut self, line: LineId);
    fn set_low(&mut self, line: LineId);
    /// Sample the line: `true` = high.
    fn read(&mut self, line: LineId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Time source for bit timing
// ───────────────────────────────────────────────────────────────

/// Free-running microsecond counter with busy-wait deadlines.
///
/// The counter wraps at `u32::MAX`; deadlines are compared with wrapping
/// arithmetic so a wrap mid-slot is harmless.  The [`DelayNs`] supertrait
/// supplies the coarse end-of-cycle wait.
pub trait ClockPort: DelayNs {
    /// Current counter value in microseconds.
    fn now_us(&mut self) -> u32;

    /// Block until the counter reaches `deadline`.
    fn wait_until(&mut self, deadline: u32);
}

/// `true` once `now` has reached or passed `deadline` (wrap-safe).
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) as i32 >= 0
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one temperature per call.
pub trait SensorPort {
    fn read(&mut self, sensor: SensorId) -> Reading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port.  Every call unconditionally drives its line.
pub trait ActuatorPort {
    fn heater_on(&mut self);
    fn heater_off(&mut self);
    fn pump_on(&mut self);
    fn pump_off(&mut self);
    /// Set the diagnostic status LED.
    fn set_status_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → reporting)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, XBee).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan-out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

/// A sink that may be absent (transport failed to open).
impl<S: EventSink> EventSink for Option<S> {
    fn emit(&mut self, event: &super::events::AppEvent) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Byte transport (wireless serial link)
// ───────────────────────────────────────────────────────────────

/// Opaque byte sink.  Opening is the adapter's constructor.
pub trait ByteSink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
    fn flush(&mut self) -> Result<(), SinkError>;
}
