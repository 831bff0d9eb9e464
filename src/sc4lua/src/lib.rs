//! # sc4lua
//!
//! SimCity 4 Lua script extraction and file name recovery.
//!
//! The game stores its Lua scripts in DBPF archives without file names: each
//! script's instance id is a 24-bit CRC of its original name tagged with
//! `0xFF` in the top byte. This library:
//! - Reproduces that hash ([`crc24`], [`file_name_hash`])
//! - Extracts scripts to `XXXXXXXX.lua` files ([`extract_scripts`])
//! - Recovers original names by scanning the scripts for `dofile` calls and
//!   header comments, then renaming the matching files ([`recover_names`])
//!
//! ## Example
//!
//! ```no_run
//! use sc4lua::{write_scripts_to_directory, RecoveryMode};
//!
//! # fn main() -> Result<(), sc4lua::Error> {
//! let summary = write_scripts_to_directory(
//!     "SimCity_1.dat".as_ref(),
//!     "scripts".as_ref(),
//!     RecoveryMode::Auto,
//! )?;
//! println!("{} written, {} renamed", summary.written, summary.renamed);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod archive;
mod caseless;
pub mod extract;
pub mod hash;
pub mod recover;
pub mod rename;
pub mod script;
mod writer;

#[doc(inline)]
pub use archive::{ArchiveEntry, DbpfArchive, MemoryArchive, ResourceArchive};
pub use caseless::CaselessMap;
#[doc(inline)]
pub use extract::{extract_scripts, list_scripts, ScriptEntry};
#[doc(inline)]
pub use hash::{crc24, crc24_bytes, crc24_units};
#[doc(inline)]
pub use recover::{
    build_recovery_map, is_maxis_archive, recover_names, CandidateSet, RecoveryMap,
    FALLBACK_NAMES, MAXIS_ARCHIVE_NAME,
};
#[doc(inline)]
pub use rename::{apply_renames, FileIndex};
#[doc(inline)]
pub use script::{
    file_name_hash, file_stem, hashed_file_name, instance_file_name, ScriptGroup,
    ADVISOR_GROUP_ID, AUTOMATA_GROUP_ID, LUA_SCRIPT_TYPE_ID,
};
pub use sc4lua_dbpf::Tgi;
#[doc(inline)]
pub use writer::{write_scripts_to_directory, ExtractionSummary, RecoveryMode};

/// Errors from extraction and name recovery
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to open archive {}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: sc4lua_dbpf::Error,
    },

    #[error("Failed to decode entry {tgi}")]
    EntryDecode {
        tgi: Tgi,
        #[source]
        source: sc4lua_dbpf::Error,
    },

    #[error("Filesystem error at {}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn fs(path: &Path, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.to_path_buf(),
            source,
        }
    }
}
