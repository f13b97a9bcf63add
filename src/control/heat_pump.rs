//! Heat-pump hysteresis.
//!
//! Thresholds are per-probe and compared against sums (×4 soil, ×2 water),
//! so no division happens on the hot path.
//!
//! ```text
//!   soil_sum < 4·activation ─┬─ pump ON
//!                            └─ heater ON unless
//!                                 water_sum > 2·deactivation
//!                                 or one water probe reads ≳ 2× the other
//!   otherwise ─ heater OFF, pump OFF
//! ```

use crate::config::ControllerConfig;
use crate::sensors::Centidegrees;

/// Relay outputs for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeatPumpDecision {
    pub heater: bool,
    pub pump: bool,
}

impl HeatPumpDecision {
    pub const OFF: Self = Self {
        heater: false,
        pump: false,
    };
}

/// Soil is cold enough for the heat pump to run.
pub fn gate_open(soil_sum: Centidegrees, cfg: &ControllerConfig) -> bool {
    soil_sum < cfg.soil_gate()
}

/// One water probe reads more than about twice the other.
///
/// Arithmetic shift, checked both ways.  For negative readings `>> 1`
/// rounds toward negative infinity, so two equal sub-zero readings count
/// as imbalanced (`-100 >> 1 == -50 > -100`).
pub fn water_imbalanced(a: Centidegrees, b: Centidegrees) -> bool {
    (a >> 1) > b || (b >> 1) > a
}

/// Heater sub-decision inside an open gate.
pub fn heater_allowed(water: [Centidegrees; 2], cfg: &ControllerConfig) -> bool {
    let [a, b] = water;
    let water_sum = a.saturating_add(b);
    !(water_sum > cfg.water_cutoff() || water_imbalanced(a, b))
}

/// Full decision for one cycle of valid readings.
pub fn decide(
    soil_sum: Centidegrees,
    water: [Centidegrees; 2],
    cfg: &ControllerConfig,
) -> HeatPumpDecision {
    if !gate_open(soil_sum, cfg) {
        return HeatPumpDecision::OFF;
    }
    HeatPumpDecision {
        heater: heater_allowed(water, cfg),
        pump: true,
    }
}
