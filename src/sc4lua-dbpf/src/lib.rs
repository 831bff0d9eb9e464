//! DBPF (Database Packed File) reader for SimCity 4
//!
//! DBPF is the resource container used by SimCity 4 (`.dat`, `.sc4lot`,
//! `.sc4model`, ...). Every resource is addressed by a type/group/instance
//! triple (TGI).
//!
//! # Format Overview
//!
//! ## Header (96 bytes, little-endian)
//!
//! - Bytes 0-3: "DBPF" magic
//! - Bytes 4-11: Major/minor file version (1.0 for SimCity 4)
//! - Bytes 32-47: Index version, entry count, offset and size
//! - Bytes 48-59: Hole table count, offset and size
//! - Bytes 60-63: Index minor version (1.1 files only)
//!
//! ## Index
//!
//! One record per resource: type, group, instance, [resource,] offset, size.
//!
//! ## Directory File
//!
//! A special resource (`E86B1EEF/E86B1EEF/286B1F03`) listing every
//! QFS-compressed entry together with its decompressed size.

mod header;
mod index;
pub mod qfs;
mod reader;

pub use header::{Header, HEADER_SIZE};
pub use index::{IndexEntry, IndexVersion, Tgi, DIRECTORY_TGI};
pub use reader::DbpfReader;

/// Magic bytes at the start of every DBPF file
pub const DBPF_MAGIC: [u8; 4] = *b"DBPF";

/// Errors from DBPF parsing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid DBPF magic: expected 'DBPF', got {0:02x?}")]
    InvalidMagic([u8; 4]),

    #[error("Unsupported DBPF version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },

    #[error("Unsupported index version {major}.{minor}")]
    UnsupportedIndexVersion { major: u32, minor: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data too short: need {needed} bytes, got {actual}")]
    DataTooShort { needed: usize, actual: usize },

    #[error("Entry {tgi} at offset {offset} with size {size} lies outside the file")]
    EntryOutOfBounds { tgi: Tgi, offset: u32, size: u32 },

    #[error("Invalid QFS signature: expected 0x10fb, got 0x{0:04x}")]
    InvalidQfsSignature(u16),

    #[error("QFS back-reference of {offset} bytes at output position {position}")]
    InvalidBackReference { offset: usize, position: usize },

    #[error("Decompression size mismatch: expected {expected}, got {actual}")]
    DecompressionSize { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check if data starts with the DBPF magic
pub fn is_dbpf(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == DBPF_MAGIC
}
