//! DBPF index table and directory file

use std::collections::HashMap;
use std::fmt;

use byteorder::{ByteOrder, LE};

use crate::{Error, Result};

/// TGI of the directory file that lists compressed entries
pub const DIRECTORY_TGI: Tgi = Tgi::new(0xE86B_1EEF, 0xE86B_1EEF, 0x286B_1F03);

/// Type/group/instance triple identifying a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tgi {
    pub type_id: u32,
    pub group_id: u32,
    pub instance_id: u32,
}

impl Tgi {
    pub const fn new(type_id: u32, group_id: u32, instance_id: u32) -> Self {
        Self {
            type_id,
            group_id,
            instance_id,
        }
    }
}

impl fmt::Display for Tgi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08X}/0x{:08X}/0x{:08X}",
            self.type_id, self.group_id, self.instance_id
        )
    }
}

/// Index table layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexVersion {
    /// 20-byte records (SimCity 4)
    V7_0,
    /// 24-byte records with a resource id after the instance
    V7_1,
}

impl IndexVersion {
    pub fn from_parts(major: u32, minor: u32) -> Result<Self> {
        match (major, minor) {
            (7, 0) => Ok(Self::V7_0),
            (7, 1) => Ok(Self::V7_1),
            _ => Err(Error::UnsupportedIndexVersion { major, minor }),
        }
    }

    /// Size of one index record
    #[inline]
    pub fn record_size(self) -> usize {
        match self {
            Self::V7_0 => 20,
            Self::V7_1 => 24,
        }
    }

    /// Size of one directory file record
    #[inline]
    pub fn directory_record_size(self) -> usize {
        self.record_size() - 4
    }

    #[inline]
    fn has_resource_id(self) -> bool {
        self == Self::V7_1
    }
}

/// One index record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub tgi: Tgi,
    /// Resource id (index 7.1 only, zero otherwise)
    pub resource_id: u32,
    /// Absolute offset of the payload in the file
    pub offset: u32,
    /// Size of the stored (possibly compressed) payload
    pub size: u32,
}

/// Parse the index table
pub(crate) fn parse_index(data: &[u8], version: IndexVersion, count: u32) -> Result<Vec<IndexEntry>> {
    let record_size = version.record_size();
    let needed = count as usize * record_size;
    if data.len() < needed {
        return Err(Error::DataTooShort {
            needed,
            actual: data.len(),
        });
    }

    let entries = data[..needed]
        .chunks_exact(record_size)
        .map(|record| {
            let tgi = read_tgi(record);
            let (resource_id, rest) = if version.has_resource_id() {
                (LE::read_u32(&record[12..]), &record[16..])
            } else {
                (0, &record[12..])
            };

            IndexEntry {
                tgi,
                resource_id,
                offset: LE::read_u32(rest),
                size: LE::read_u32(&rest[4..]),
            }
        })
        .collect();

    Ok(entries)
}

/// Parse the directory file into TGI -> decompressed size
///
/// A trailing partial record is ignored.
pub(crate) fn parse_directory(data: &[u8], version: IndexVersion) -> HashMap<Tgi, u32> {
    let record_size = version.directory_record_size();
    let size_offset = record_size - 4;

    data.chunks_exact(record_size)
        .map(|record| (read_tgi(record), LE::read_u32(&record[size_offset..])))
        .collect()
}

fn read_tgi(record: &[u8]) -> Tgi {
    Tgi::new(
        LE::read_u32(record),
        LE::read_u32(&record[4..]),
        LE::read_u32(&record[8..]),
    )
}

#[cfg(test)]
pub(crate) fn build_record(version: IndexVersion, entry: &IndexEntry) -> Vec<u8> {
    let mut record = vec![0u8; version.record_size()];
    LE::write_u32(&mut record[0..], entry.tgi.type_id);
    LE::write_u32(&mut record[4..], entry.tgi.group_id);
    LE::write_u32(&mut record[8..], entry.tgi.instance_id);
    let mut pos = 12;
    if version.has_resource_id() {
        LE::write_u32(&mut record[pos..], entry.resource_id);
        pos += 4;
    }
    LE::write_u32(&mut record[pos..], entry.offset);
    LE::write_u32(&mut record[pos + 4..], entry.size);
    record
}
