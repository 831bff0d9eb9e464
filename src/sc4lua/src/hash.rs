//! CRC-24 string hash used by the game for Lua script names
//!
//! A table-driven CRC with a 24-bit register, the generator `0x01864CFB`
//! and the initial value `0x00B704CE`. The game hashes wide strings, so the
//! input is fed as UTF-16 code units; only the low byte of each unit enters
//! the table lookup.

/// Initial register value
pub const CRC24_INIT: u32 = 0x00B7_04CE;

/// Generator polynomial (including the x^24 term)
pub const CRC24_POLY: u32 = 0x0186_4CFB;

/// Mask for the 24-bit result
pub const CRC24_MASK: u32 = 0x00FF_FFFF;

/// Lookup table, one entry per byte value
pub static CRC24_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 16;
        let mut bit = 0;
        while bit < 8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

#[inline]
fn update(crc: u32, unit: u32) -> u32 {
    (crc << 8) ^ CRC24_TABLE[((crc >> 16) ^ unit) as usize & 0xFF]
}

/// Hash a sequence of UTF-16 code units
pub fn crc24_units<I>(units: I, case_insensitive: bool) -> u32
where
    I: IntoIterator<Item = u16>,
{
    let crc = units.into_iter().fold(CRC24_INIT, |crc, unit| {
        let unit = if case_insensitive {
            fold_ascii(unit)
        } else {
            unit
        };
        update(crc, unit as u32)
    });

    crc & CRC24_MASK
}

/// Hash a string the way the game does
///
/// # Example
///
/// ```
/// use sc4lua::crc24;
///
/// assert_eq!(crc24("examples", false), 0xE6C952);
/// assert_eq!(crc24("EXAMPLES", true), crc24("examples", false));
/// ```
pub fn crc24(text: &str, case_insensitive: bool) -> u32 {
    crc24_units(text.encode_utf16(), case_insensitive)
}

/// Hash raw bytes, one code unit per byte
pub fn crc24_bytes(data: &[u8], case_insensitive: bool) -> u32 {
    crc24_units(data.iter().map(|&b| b as u16), case_insensitive)
}

#[inline]
fn fold_ascii(unit: u16) -> u16 {
    if (b'A' as u16..=b'Z' as u16).contains(&unit) {
        unit + 0x20
    } else {
        unit
    }
}
