//! Sensor layer: the seven logical temperature probes.
//!
//! Each [`SensorId`] is bound to one dedicated line through the
//! [`LineMap`]; reading it runs one full 1-Wire transaction on that line.
//! Reads happen in [`SensorId::ALL`] order every cycle.

pub mod probe;

use crate::app::ports::{ClockPort, LinePort};
use crate::config::{ControllerConfig, LineId, LineMap, OneWireTiming};
use crate::drivers::one_wire::OneWire;
use crate::error::ProbeError;

/// Temperature in hundredths of a degree Celsius.
pub type Centidegrees = i32;

/// One probe's result for the current cycle.  Never cached across cycles.
pub type Reading = Result<Centidegrees, ProbeError>;

/// Logical sensors, in fixed read order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorId {
    Air,
    SoilA,
    SoilB,
    SoilC,
    SoilD,
    WaterA,
    WaterB,
}

impl SensorId {
    /// Read order: air, soil A-D, water A-B.
    pub const ALL: [Self; 7] = [
        Self::Air,
        Self::SoilA,
        Self::SoilB,
        Self::SoilC,
        Self::SoilD,
        Self::WaterA,
        Self::WaterB,
    ];

    pub const SOIL: [Self; 4] = [Self::SoilA, Self::SoilB, Self::SoilC, Self::SoilD];

    pub const WATER: [Self; 2] = [Self::WaterA, Self::WaterB];

    /// The line this sensor's probe occupies.
    pub fn line(self, map: &LineMap) -> LineId {
        match self {
            Self::Air => map.air,
            Self::SoilA => map.soil[0],
            Self::SoilB => map.soil[1],
            Self::SoilC => map.soil[2],
            Self::SoilD => map.soil[3],
            Self::WaterA => map.water[0],
            Self::WaterB => map.water[1],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::SoilA => "soil A",
            Self::SoilB => "soil B",
            Self::SoilC => "soil C",
            Self::SoilD => "soil D",
            Self::WaterA => "water A",
            Self::WaterB => "water B",
        }
    }
}

/// Binds each logical sensor to its line and runs the probe protocol.
#[derive(Debug, Clone)]
pub struct SensorHub {
    lines: LineMap,
    timing: OneWireTiming,
    verify_crc: bool,
}

impl SensorHub {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            lines: config.lines,
            timing: config.timing,
            verify_crc: config.verify_crc,
        }
    }

    /// One full conversion and scratchpad read on the sensor's line.
    pub fn read<B: LinePort + ClockPort>(&self, board: &mut B, sensor: SensorId) -> Reading {
        OneWire::new(board, sensor.line(&self.lines), self.timing).read_temperature(self.verify_crc)
    }

    pub fn lines(&self) -> &LineMap {
        &self.lines
    }
}

/// Value to print for a reading; unavailable readings show the legacy sentinel.
pub fn report_value(reading: Reading) -> i32 {
    reading.unwrap_or(ProbeError::LEGACY_SENTINEL)
}

/// Sum of a group of readings, or the first fault in the group.
///
/// Saturates; decoded probe values never get near the limits.
pub fn sum_readings(readings: &[Reading]) -> Reading {
    readings.iter().try_fold(0, |acc: i32, r| r.map(|v| acc.saturating_add(v)))
}
