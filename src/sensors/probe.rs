//! DS18B20 scratchpad decoding.
//!
//! Scratchpad layout (9 bytes): temperature LSB, temperature MSB, TH, TL,
//! configuration, three reserved bytes, CRC-8.  The temperature is a
//! sign-extended 12-bit value in 1/16 °C.

use super::Centidegrees;

/// Bytes in one scratchpad transaction.
pub const SCRATCHPAD_LEN: usize = 9;

/// Raw scratchpad as read from the probe.
pub type Scratchpad = [u8; SCRATCHPAD_LEN];

/// Decode the temperature field into hundredths of a degree.
///
/// The sign comes from the upper nibble of byte 1; the 11-bit magnitude
/// from byte 0 and the low three bits of byte 1.  Negative values are
/// two's-complement inside those 11 bits.  Scaling is `×100 >> 4`, which
/// truncates toward zero on the magnitude.
pub fn decode_temperature(pad: &Scratchpad) -> Centidegrees {
    let negative = pad[1] & 0xF0 != 0;
    let mut magnitude = (i32::from(pad[1] & 0x07) << 8) | i32::from(pad[0]);
    if negative {
        magnitude = (magnitude ^ 0x7FF) + 1;
    }
    let centi = (magnitude * 100) >> 4;
    if negative { -centi } else { centi }
}

/// Dallas/Maxim CRC-8 (x^8 + x^5 + x^4 + 1, reflected).
pub fn crc8(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in bytes {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// `true` if the trailing CRC byte matches the first eight.
pub fn crc_valid(pad: &Scratchpad) -> bool {
    crc8(&pad[..SCRATCHPAD_LEN - 1]) == pad[SCRATCHPAD_LEN - 1]
}

/// Build a scratchpad for a raw 1/16 °C value, CRC included.
///
/// Mirrors what a probe produces at power-on defaults (TH=75, TL=70,
/// 12-bit resolution).
pub fn encode_scratchpad(raw_sixteenths: i16) -> Scratchpad {
    let [lsb, msb] = raw_sixteenths.to_le_bytes();
    let mut pad = [lsb, msb, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x00];
    pad[8] = crc8(&pad[..8]);
    pad
}
