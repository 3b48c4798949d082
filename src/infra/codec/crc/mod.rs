//! CRC-16/CCITT engine (poly 0x1021, init 0xFFFF, MSB first, no final xor).
//!
//! This is the `crc_ccitt` variant of the legacy device family: every message
//! ends with this checksum, stored little-endian.

/// Generator polynomial.
pub const CCITT_POLY: u16 = 0x1021;
/// Register value before the first byte.
pub const CCITT_INIT: u16 = 0xFFFF;

/// Byte-indexed lookup table, built at compile time.
static TABLE: [u16; 256] = build_table(CCITT_POLY);

const fn build_table(poly: u16) -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ poly
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Streaming CRC register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16Ccitt {
    value: u16,
}

impl Default for Crc16Ccitt {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc16Ccitt {
    pub const fn new() -> Self {
        Self { value: CCITT_INIT }
    }

    /// Feed more bytes into the register.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let idx = ((self.value >> 8) as u8) ^ byte;
            self.value = (self.value << 8) ^ TABLE[idx as usize];
        }
    }

    pub const fn finalize(&self) -> u16 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = CCITT_INIT;
    }
}

/// One-shot checksum of `data`.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = Crc16Ccitt::new();
    crc.update(data);
    crc.finalize()
}
