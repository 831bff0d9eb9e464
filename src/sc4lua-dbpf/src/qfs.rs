//! QFS (RefPack) decompression
//!
//! Compressed DBPF entries start with a 4-byte little-endian compressed
//! size, followed by a RefPack stream:
//! - Byte 0: Flags (0x10, plus 0x80 for 4-byte sizes, 0x01 when a
//!   compressed size field follows)
//! - Byte 1: 0xFB signature
//! - Next 3 (or 4) bytes: Big-endian decompressed size
//! - Remaining: Control codes with literal runs and back-references

use byteorder::{ByteOrder, LE};

use crate::{Error, Result};

/// Signature byte following the flags
pub const QFS_SIGNATURE: u8 = 0xFB;

/// Bytes before the RefPack stream (the DBPF compressed size prefix)
const SIZE_PREFIX: usize = 4;

const FLAG_LARGE_SIZES: u8 = 0x80;
const FLAG_HAS_COMPRESSED_SIZE: u8 = 0x01;
// Bits that must read as 0x10 regardless of the optional flags
const FLAG_MASK: u8 = !(FLAG_LARGE_SIZES | FLAG_HAS_COMPRESSED_SIZE);

/// Check if an entry payload carries a QFS header
pub fn is_compressed(data: &[u8]) -> bool {
    data.len() >= SIZE_PREFIX + 2
        && data[SIZE_PREFIX] & FLAG_MASK == 0x10
        && data[SIZE_PREFIX + 1] == QFS_SIGNATURE
}

/// Decompressed size stored in the QFS header
pub fn decompressed_size(data: &[u8]) -> Result<usize> {
    Header::parse(data).map(|h| h.decompressed_size)
}

struct Header {
    decompressed_size: usize,
    /// Offset of the first control code
    data_start: usize,
}

impl Header {
    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < SIZE_PREFIX + 2 {
            return Err(Error::DataTooShort {
                needed: SIZE_PREFIX + 2,
                actual: data.len(),
            });
        }

        if !is_compressed(data) {
            let signature = u16::from_be_bytes([data[SIZE_PREFIX], data[SIZE_PREFIX + 1]]);
            return Err(Error::InvalidQfsSignature(signature));
        }

        let flags = data[SIZE_PREFIX];
        let width = if flags & FLAG_LARGE_SIZES != 0 { 4 } else { 3 };
        let mut pos = SIZE_PREFIX + 2;
        if flags & FLAG_HAS_COMPRESSED_SIZE != 0 {
            pos += width;
        }

        let needed = pos + width;
        if data.len() < needed {
            return Err(Error::DataTooShort {
                needed,
                actual: data.len(),
            });
        }

        let decompressed_size = data[pos..needed]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok(Self {
            decompressed_size,
            data_start: needed,
        })
    }
}

/// Decompress a QFS-compressed entry payload
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = Header::parse(data)?;

    let stored_size = LE::read_u32(data) as usize;
    let end = if stored_size > header.data_start && stored_size <= data.len() {
        stored_size
    } else {
        data.len()
    };

    let out = decompress_stream(&data[header.data_start..end], header.decompressed_size)?;

    if out.len() != header.decompressed_size {
        return Err(Error::DecompressionSize {
            expected: header.decompressed_size,
            actual: out.len(),
        });
    }

    Ok(out)
}

/// Decode RefPack control codes until a stop code or the end of input
fn decompress_stream(input: &[u8], expected: usize) -> Result<Vec<u8>> {
    // Header size is untrusted
    let mut out = Vec::with_capacity(expected.min(input.len().saturating_mul(8)));
    let mut pos = 0;

    while pos < input.len() {
        let cc = input[pos];

        let (plain, copy, offset, width) = match cc {
            0x00..=0x7F => {
                let b1 = byte_at(input, pos + 1)? as usize;
                let plain = (cc & 0x03) as usize;
                let copy = ((cc & 0x1C) >> 2) as usize + 3;
                let offset = (((cc & 0x60) as usize) << 3) + b1 + 1;
                (plain, copy, offset, 2)
            }
            0x80..=0xBF => {
                let b1 = byte_at(input, pos + 1)? as usize;
                let b2 = byte_at(input, pos + 2)? as usize;
                let plain = b1 >> 6;
                let copy = (cc & 0x3F) as usize + 4;
                let offset = ((b1 & 0x3F) << 8) + b2 + 1;
                (plain, copy, offset, 3)
            }
            0xC0..=0xDF => {
                let b1 = byte_at(input, pos + 1)? as usize;
                let b2 = byte_at(input, pos + 2)? as usize;
                let b3 = byte_at(input, pos + 3)? as usize;
                let plain = (cc & 0x03) as usize;
                let copy = (((cc & 0x0C) as usize) << 6) + b3 + 5;
                let offset = (((cc & 0x10) as usize) << 12) + (b1 << 8) + b2 + 1;
                (plain, copy, offset, 4)
            }
            0xE0..=0xFB => ((((cc & 0x1F) as usize) << 2) + 4, 0, 0, 1),
            0xFC..=0xFF => {
                let plain = (cc & 0x03) as usize;
                copy_literal(input, pos + 1, plain, &mut out)?;
                break;
            }
        };

        pos += width;
        copy_literal(input, pos, plain, &mut out)?;
        pos += plain;

        if copy > 0 {
            copy_back_reference(&mut out, offset, copy)?;
        }
    }

    Ok(out)
}

#[inline]
fn byte_at(input: &[u8], pos: usize) -> Result<u8> {
    input.get(pos).copied().ok_or(Error::DataTooShort {
        needed: pos + 1,
        actual: input.len(),
    })
}

fn copy_literal(input: &[u8], start: usize, len: usize, out: &mut Vec<u8>) -> Result<()> {
    let end = start + len;
    let bytes = input.get(start..end).ok_or(Error::DataTooShort {
        needed: end,
        actual: input.len(),
    })?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn copy_back_reference(out: &mut Vec<u8>, offset: usize, len: usize) -> Result<()> {
    if offset > out.len() {
        return Err(Error::InvalidBackReference {
            offset,
            position: out.len(),
        });
    }

    // Source and destination may overlap, so copy one byte at a time
    let start = out.len() - offset;
    for i in 0..len {
        let b = out[start + i];
        out.push(b);
    }
    Ok(())
}
