//! Error types for the Vegimeter firmware.
//!
//! All variants are `Copy`: they travel through the safety monitor and FSM
//! context without allocation.  The binary folds the boot-time ones into
//! `anyhow`.

use core::fmt;

// ---------------------------------------------------------------------------
// Probe errors
// ---------------------------------------------------------------------------

/// Why a probe could not deliver a temperature.
///
/// Replaces the historical magic reading `54321`: a fault can never be
/// mistaken for a real temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// No presence pulse after a bus reset.
    NoPresence,
    /// Line held low while it should idle high.
    BusStuck,
    /// The probe never signalled end of conversion.
    ConversionTimeout,
    /// Scratchpad CRC-8 did not match.
    CrcMismatch,
}

impl ProbeError {
    /// Value printed in status lines in place of an unavailable reading.
    pub const LEGACY_SENTINEL: i32 = 54_321;
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPresence => write!(f, "no presence pulse"),
            Self::BusStuck => write!(f, "bus stuck low"),
            Self::ConversionTimeout => write!(f, "conversion timeout"),
            Self::CrcMismatch => write!(f, "scratchpad CRC mismatch"),
        }
    }
}

// ---------------------------------------------------------------------------
// Halt codes
// ---------------------------------------------------------------------------

/// Terminal safety faults.  Once latched, the controller stays halted until
/// an external power cycle; software never clears a halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HaltCode {
    /// A probe returned no usable reading.
    BadReading = 1,
    /// Air temperature reached the configured maximum.
    OverTemperature = 2,
    /// Heater stayed on for more consecutive cycles than allowed.
    HeaterRunaway = 3,
}

impl HaltCode {
    /// Numeric code carried in the halt report.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Numeric code for an optional halt (`0` = none).
    pub fn code_of(halt: Option<Self>) -> u8 {
        halt.map_or(0, Self::code)
    }
}

impl fmt::Display for HaltCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadReading => write!(f, "bad reading"),
            Self::OverTemperature => write!(f, "over temperature"),
            Self::HeaterRunaway => write!(f, "heater runaway"),
        }
    }
}

// ---------------------------------------------------------------------------
// Reporting transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Transport could not be opened.
    OpenFailed,
    /// A write or flush did not complete.
    WriteFailed,
    /// Formatted line did not fit the line buffer.
    LineTooLong,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed => write!(f, "transport open failed"),
            Self::WriteFailed => write!(f, "transport write failed"),
            Self::LineTooLong => write!(f, "line too long"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation; the text names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Board bring-up errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A GPIO could not be reset (IDF return code).
    GpioConfigFailed(i32),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

impl std::error::Error for ProbeError {}
impl std::error::Error for SinkError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for BoardError {}
