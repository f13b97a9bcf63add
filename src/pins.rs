//! Default GPIO assignments for the Vegimeter board (ESP32-S3).
//!
//! Single source of truth for [`LineMap::default`](crate::config::LineMap).
//! Every probe sits alone on its own line; there is no bus addressing.
//!
//! Avoided on the S3: strapping pins 0, 3, 45, 46; USB 19-20; flash and
//! PSRAM 26-37.

// ---------------------------------------------------------------------------
// Temperature probes (DS18B20, 4.7 kOhm pull-up each)
// ---------------------------------------------------------------------------

/// Enclosure air probe.
pub const AIR_PROBE: u8 = 4;
/// Reservoir water probe A.
pub const WATER_A_PROBE: u8 = 5;
/// Buried soil probes A-D.
pub const SOIL_A_PROBE: u8 = 6;
pub const SOIL_B_PROBE: u8 = 7;
pub const SOIL_C_PROBE: u8 = 8;
pub const SOIL_D_PROBE: u8 = 9;
/// Reservoir water probe B.
pub const WATER_B_PROBE: u8 = 10;

// ---------------------------------------------------------------------------
// Actuators (relay drivers, active HIGH)
// ---------------------------------------------------------------------------

pub const HEATER: u8 = 11;
pub const PUMP: u8 = 12;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Status LED used for the per-cycle strobe.
pub const STATUS_LED: u8 = 13;

// ---------------------------------------------------------------------------
// Wireless serial (XBee) UART
// ---------------------------------------------------------------------------

pub const XBEE_TX: u8 = 17;
pub const XBEE_RX: u8 = 18;
/// XBee link rate.
pub const XBEE_BAUD: u32 = 9_600;
