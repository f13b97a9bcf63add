//! Controller configuration.
//!
//! All tunables for one Vegimeter build.  Temperatures are in hundredths
//! of a degree Celsius.  The earlier controller generations differ only in
//! line map, thresholds and which safety features are present, so they are
//! expressed as presets of this one struct.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// One addressable digital line: the GPIO number on the ESP32-S3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(pub u8);

impl LineId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Line assignment for every sensor and actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMap {
    pub air: LineId,
    pub soil: [LineId; 4],
    pub water: [LineId; 2],
    pub heater: LineId,
    pub pump: LineId,
    pub status_led: LineId,
}

impl Default for LineMap {
    fn default() -> Self {
        Self {
            air: LineId(pins::AIR_PROBE),
            soil: [
                LineId(pins::SOIL_A_PROBE),
                LineId(pins::SOIL_B_PROBE),
                LineId(pins::SOIL_C_PROBE),
                LineId(pins::SOIL_D_PROBE),
            ],
            water: [LineId(pins::WATER_A_PROBE), LineId(pins::WATER_B_PROBE)],
            heater: LineId(pins::HEATER),
            pump: LineId(pins::PUMP),
            status_led: LineId(pins::STATUS_LED),
        }
    }
}

impl LineMap {
    /// Every assigned line, probes first.
    pub fn all(&self) -> [LineId; 10] {
        [
            self.air,
            self.soil[0],
            self.soil[1],
            self.soil[2],
            self.soil[3],
            self.water[0],
            self.water[1],
            self.heater,
            self.pump,
            self.status_led,
        ]
    }
}

/// 1-Wire protocol timing, in microseconds unless noted.
///
/// Slot-relative offsets are measured from the falling edge that opens the
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneWireTiming {
    /// Reset pulse width.
    pub reset_low_us: u32,
    /// Settling time after release before presence is sampled.
    pub presence_settle_us: u32,
    /// Window after release in which a presence pulse must appear.
    pub presence_timeout_us: u32,
    /// Time from release until the bus is usable again.
    pub reset_recovery_us: u32,
    /// Width of one bit slot, recovery included.
    pub slot_us: u32,
    /// Low-pulse width encoding a 1.
    pub write_one_low_us: u32,
    /// Low-pulse width encoding a 0.
    pub write_zero_low_us: u32,
    /// Low-pulse width opening a read slot.
    pub read_low_us: u32,
    /// Sample offset inside a read slot.
    pub read_sample_us: u32,
    /// Delay before re-sampling a line found low during the idle check.
    pub idle_recheck_us: u32,
    /// Longest time a conversion may take (milliseconds).
    pub conversion_timeout_ms: u32,
}

impl Default for OneWireTiming {
    fn default() -> Self {
        Self {
            reset_low_us: 480,
            presence_settle_us: 15,
            presence_timeout_us: 240,
            reset_recovery_us: 480,
            slot_us: 70,
            write_one_low_us: 6,
            write_zero_low_us: 60,
            read_low_us: 6,
            read_sample_us: 15,
            idle_recheck_us: 100,
            conversion_timeout_ms: 750,
        }
    }
}

/// Core controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Hysteresis thresholds (per sensor, centi-°C) ---
    /// Soil temperature below which the heat pump runs.
    pub heat_pump_activation: i32,
    /// Water temperature above which the heater is switched off.
    pub heater_deactivation: i32,

    // --- Timing ---
    /// Pause between control cycles (milliseconds).
    pub polling_period_ms: u32,

    // --- Safety ---
    /// Whether faults latch a halt.  Earlier generations had no halts.
    pub safety_halt: bool,
    /// Air temperature at or above which the controller halts.
    pub max_air_temp: i32,
    /// Consecutive heater-on cycles allowed before a runaway halt.
    pub max_heater_periods: u32,

    // --- Probes ---
    /// Reject scratchpads whose CRC-8 does not match.
    pub verify_crc: bool,
    pub timing: OneWireTiming,

    // --- Diagnostics ---
    /// Toggle the status LED every cycle (steady on while halted).
    pub diagnostic_strobe: bool,

    pub lines: LineMap,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            heat_pump_activation: 2100,
            heater_deactivation: 4300,

            polling_period_ms: 1000,

            safety_halt: true,
            max_air_temp: 5000,
            max_heater_periods: 3600, // one hour at 1 Hz

            verify_crc: false,
            timing: OneWireTiming::default(),

            diagnostic_strobe: true,

            lines: LineMap::default(),
        }
    }
}

impl ControllerConfig {
    /// First-generation engine: same thresholds, no halts, no strobe.
    pub fn basic() -> Self {
        Self {
            safety_halt: false,
            diagnostic_strobe: false,
            ..Self::default()
        }
    }

    /// Soil-sum threshold for four soil probes.
    pub fn soil_gate(&self) -> i32 {
        self.heat_pump_activation * 4
    }

    /// Water-sum threshold for two water probes.
    pub fn water_cutoff(&self) -> i32 {
        self.heater_deactivation * 2
    }

    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heat_pump_activation <= 0 {
            return Err(ConfigError::ValidationFailed(
                "heat_pump_activation must be positive",
            ));
        }
        if self.heater_deactivation <= 0 {
            return Err(ConfigError::ValidationFailed(
                "heater_deactivation must be positive",
            ));
        }
        if self.polling_period_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "polling_period_ms must be non-zero",
            ));
        }
        if self.max_heater_periods == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_heater_periods must be non-zero",
            ));
        }

        let lines = self.lines.all();
        for (i, a) in lines.iter().enumerate() {
            if lines[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed("line assigned twice"));
            }
        }

        let t = &self.timing;
        if t.write_zero_low_us >= t.slot_us || t.read_sample_us >= t.slot_us {
            return Err(ConfigError::ValidationFailed(
                "slot offsets must fit inside the slot",
            ));
        }
        if t.write_one_low_us >= t.read_sample_us || t.read_low_us >= t.read_sample_us {
            return Err(ConfigError::ValidationFailed(
                "short pulses must end before the read sample point",
            ));
        }
        if t.presence_settle_us >= t.presence_timeout_us
            || t.presence_timeout_us >= t.reset_recovery_us
        {
            return Err(ConfigError::ValidationFailed(
                "presence window must end inside reset recovery",
            ));
        }
        Ok(())
    }
}
