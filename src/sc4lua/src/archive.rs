//! Resource archive abstraction
//!
//! Extraction only needs each entry's TGI and a way to load its decoded
//! payload. [`DbpfArchive`] reads real `.dat` files; [`MemoryArchive`] holds
//! entries in memory for tests and tooling.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use sc4lua_dbpf::{qfs, DbpfReader, Tgi};

use crate::{Error, Result};

/// One entry of an archive, by position in [`ResourceArchive::entries`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub tgi: Tgi,
    pub position: usize,
    /// Stored size in bytes, before decompression
    pub size: u32,
}

/// Source of TGI-addressed resources
pub trait ResourceArchive {
    /// All entries in archive order
    fn entries(&self) -> Vec<ArchiveEntry>;

    /// Load an entry's decoded payload
    fn load(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>>;
}

fn missing_entry(entry: &ArchiveEntry) -> Error {
    Error::EntryDecode {
        tgi: entry.tgi,
        source: sc4lua_dbpf::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("No entry at position {}", entry.position),
        )),
    }
}

/// DBPF archive on disk
pub struct DbpfArchive {
    path: PathBuf,
    reader: DbpfReader<BufReader<File>>,
}

impl DbpfArchive {
    /// Open and index a DBPF file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = DbpfReader::open(&path).map_err(|source| Error::ArchiveOpen {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), entries = reader.entries().len(), "Opened archive");

        Ok(Self { path, reader })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reader(&self) -> &DbpfReader<BufReader<File>> {
        &self.reader
    }
}

impl ResourceArchive for DbpfArchive {
    fn entries(&self) -> Vec<ArchiveEntry> {
        self.reader
            .entries()
            .iter()
            .enumerate()
            .map(|(position, e)| ArchiveEntry {
                tgi: e.tgi,
                position,
                size: e.size,
            })
            .collect()
    }

    fn load(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let index_entry = *self
            .reader
            .entries()
            .get(entry.position)
            .filter(|e| e.tgi == entry.tgi)
            .ok_or_else(|| missing_entry(entry))?;

        self.reader
            .read(&index_entry)
            .map_err(|source| Error::EntryDecode {
                tgi: entry.tgi,
                source,
            })
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    tgi: Tgi,
    data: Vec<u8>,
    compressed: bool,
}

/// In-memory archive
///
/// Entries added with [`MemoryArchive::push_compressed`] hold QFS data and
/// are decompressed on load, like DBPF entries listed in the directory file.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: Vec<MemoryEntry>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry stored as-is
    pub fn push(&mut self, tgi: Tgi, data: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.push(MemoryEntry {
            tgi,
            data: data.into(),
            compressed: false,
        });
        self
    }

    /// Add a QFS-compressed entry
    pub fn push_compressed(&mut self, tgi: Tgi, data: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.push(MemoryEntry {
            tgi,
            data: data.into(),
            compressed: true,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceArchive for MemoryArchive {
    fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, e)| ArchiveEntry {
                tgi: e.tgi,
                position,
                size: e.data.len() as u32,
            })
            .collect()
    }

    fn load(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let stored = self
            .entries
            .get(entry.position)
            .filter(|e| e.tgi == entry.tgi)
            .ok_or_else(|| missing_entry(entry))?;

        if !stored.compressed {
            return Ok(stored.data.clone());
        }

        qfs::decompress(&stored.data).map_err(|source| Error::EntryDecode {
            tgi: entry.tgi,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LUA: Tgi = Tgi::new(0xCA63_E2A3, 0x4A5E_8EF6, 1);

    #[test]
    fn test_memory_archive_load() {
        let mut archive = MemoryArchive::new();
        archive.push(LUA, "-- test");

        let entries = archive.entries();
        assert_eq!(
            entries,
            vec![ArchiveEntry {
                tgi: LUA,
                position: 0,
                size: 7
            }]
        );
        assert_eq!(archive.load(&entries[0]).unwrap(), b"-- test");
    }

    #[test]
    fn test_memory_archive_compressed() {
        let mut archive = MemoryArchive::new();
        archive.push_compressed(
            LUA,
            vec![0x0C, 0, 0, 0, 0x10, 0xFB, 0x00, 0x00, 0x02, 0xFE, b'o', b'k'],
        );

        let entry = archive.entries()[0];
        assert_eq!(archive.load(&entry).unwrap(), b"ok");
    }

    #[test]
    fn test_memory_archive_bad_compressed_data() {
        let mut archive = MemoryArchive::new();
        archive.push_compressed(LUA, b"not qfs at all".to_vec());

        let entry = archive.entries()[0];
        assert!(matches!(
            archive.load(&entry),
            Err(Error::EntryDecode { tgi, .. }) if tgi == LUA
        ));
    }

    #[test]
    fn test_memory_archive_stale_entry() {
        let mut archive = MemoryArchive::new();
        archive.push(LUA, "x");

        let stale = ArchiveEntry {
            tgi: LUA,
            position: 5,
            size: 1,
        };
        assert!(matches!(archive.load(&stale), Err(Error::EntryDecode { .. })));
    }

    #[test]
    fn test_dbpf_archive_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.dat");

        match DbpfArchive::open(&path) {
            Err(Error::ArchiveOpen { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ArchiveOpen, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_dbpf_archive_open_not_dbpf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 128]).unwrap();

        assert!(matches!(
            DbpfArchive::open(file.path()),
            Err(Error::ArchiveOpen {
                source: sc4lua_dbpf::Error::InvalidMagic(_),
                ..
            })
        ));
    }
}
