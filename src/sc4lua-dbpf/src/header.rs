//! DBPF file header

use byteorder::{ByteOrder, LE};

use crate::index::IndexVersion;
use crate::{is_dbpf, Error, Result};

/// Header size in bytes
pub const HEADER_SIZE: usize = 96;

// Field offsets
const MAJOR_VERSION: usize = 4;
const MINOR_VERSION: usize = 8;
const DATE_CREATED: usize = 24;
const DATE_MODIFIED: usize = 28;
const INDEX_MAJOR_VERSION: usize = 32;
const INDEX_ENTRY_COUNT: usize = 36;
const INDEX_OFFSET: usize = 40;
const INDEX_SIZE: usize = 44;
const HOLE_ENTRY_COUNT: usize = 48;
const HOLE_OFFSET: usize = 52;
const HOLE_SIZE: usize = 56;
const INDEX_MINOR_VERSION: usize = 60;

/// DBPF file header (96 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major_version: u32,
    pub minor_version: u32,
    /// Creation time (unix seconds, often zero)
    pub date_created: u32,
    /// Modification time (unix seconds, often zero)
    pub date_modified: u32,
    pub index_version: IndexVersion,
    pub index_entry_count: u32,
    pub index_offset: u32,
    pub index_size: u32,
    pub hole_entry_count: u32,
    pub hole_offset: u32,
    pub hole_size: u32,
}

impl Header {
    /// Parse a header from the first 96 bytes of a DBPF file
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::DataTooShort {
                needed: HEADER_SIZE,
                actual: data.len(),
            });
        }

        if !is_dbpf(data) {
            return Err(Error::InvalidMagic([data[0], data[1], data[2], data[3]]));
        }

        let major_version = LE::read_u32(&data[MAJOR_VERSION..]);
        let minor_version = LE::read_u32(&data[MINOR_VERSION..]);
        if major_version != 1 {
            return Err(Error::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }

        let index_major = LE::read_u32(&data[INDEX_MAJOR_VERSION..]);
        // 1.0 files leave this field as padding
        let index_minor = if minor_version >= 1 {
            LE::read_u32(&data[INDEX_MINOR_VERSION..])
        } else {
            0
        };
        let index_version = IndexVersion::from_parts(index_major, index_minor)?;

        Ok(Self {
            major_version,
            minor_version,
            date_created: LE::read_u32(&data[DATE_CREATED..]),
            date_modified: LE::read_u32(&data[DATE_MODIFIED..]),
            index_version,
            index_entry_count: LE::read_u32(&data[INDEX_ENTRY_COUNT..]),
            index_offset: LE::read_u32(&data[INDEX_OFFSET..]),
            index_size: LE::read_u32(&data[INDEX_SIZE..]),
            hole_entry_count: LE::read_u32(&data[HOLE_ENTRY_COUNT..]),
            hole_offset: LE::read_u32(&data[HOLE_OFFSET..]),
            hole_size: LE::read_u32(&data[HOLE_SIZE..]),
        })
    }

    /// Size of the index table implied by the entry count
    #[inline]
    pub fn index_table_len(&self) -> usize {
        self.index_entry_count as usize * self.index_version.record_size()
    }
}

#[cfg(test)]
pub(crate) fn build_header(minor_version: u32, index_minor: u32, count: u32, offset: u32) -> Vec<u8> {
    let record_size = if index_minor >= 1 { 24 } else { 20 };
    let mut data = vec![0u8; HEADER_SIZE];
    data[..4].copy_from_slice(&crate::DBPF_MAGIC);
    LE::write_u32(&mut data[MAJOR_VERSION..], 1);
    LE::write_u32(&mut data[MINOR_VERSION..], minor_version);
    LE::write_u32(&mut data[INDEX_MAJOR_VERSION..], 7);
    LE::write_u32(&mut data[INDEX_ENTRY_COUNT..], count);
    LE::write_u32(&mut data[INDEX_OFFSET..], offset);
    LE::write_u32(&mut data[INDEX_SIZE..], count * record_size);
    LE::write_u32(&mut data[INDEX_MINOR_VERSION..], index_minor);
    data
}
