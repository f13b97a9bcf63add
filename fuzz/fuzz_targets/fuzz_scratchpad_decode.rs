//! Fuzz target: scratchpad decoding and CRC-8
//!
//! Arbitrary 9-byte scratchpads must decode without panicking to a value
//! the 12-bit field can express, and the CRC check must agree with a
//! recomputed checksum.
//!
//! cargo fuzz run fuzz_scratchpad_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use vegimeter::sensors::probe::{crc8, crc_valid, decode_temperature, Scratchpad, SCRATCHPAD_LEN};

fuzz_target!(|data: &[u8]| {
    let Some(bytes) = data.get(..SCRATCHPAD_LEN) else {
        return;
    };
    let Ok(pad) = Scratchpad::try_from(bytes) else {
        return;
    };

    // 11-bit magnitude (plus the 0x800 two's-complement edge) at 100/16.
    let centi = decode_temperature(&pad);
    assert!(centi.abs() <= (0x800 * 100) >> 4, "decoded {centi} out of range");

    let expected = crc8(&pad[..SCRATCHPAD_LEN - 1]) == pad[SCRATCHPAD_LEN - 1];
    assert_eq!(crc_valid(&pad), expected);

    // Appending the CRC byte to its own input always yields zero.
    let mut sealed = pad;
    sealed[SCRATCHPAD_LEN - 1] = crc8(&pad[..SCRATCHPAD_LEN - 1]);
    assert!(crc_valid(&sealed));
    assert_eq!(crc8(&sealed), 0);
});
