//! DBPF archive reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::header::{Header, HEADER_SIZE};
use crate::index::{parse_directory, parse_index, IndexEntry, Tgi, DIRECTORY_TGI};
use crate::{qfs, Error, Result};

/// Reader for DBPF archives
///
/// The header, index and directory file are read up front; entry payloads
/// are read on demand.
pub struct DbpfReader<R> {
    reader: R,
    header: Header,
    entries: Vec<IndexEntry>,
    /// Compressed entries and their decompressed sizes
    directory: HashMap<Tgi, u32>,
    file_len: u64,
}

impl DbpfReader<BufReader<File>> {
    /// Open a DBPF file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> DbpfReader<R> {
    /// Parse the header, index and directory from a reader
    pub fn new(mut reader: R) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut header_bytes = Vec::with_capacity(HEADER_SIZE);
        (&mut reader)
            .take(HEADER_SIZE as u64)
            .read_to_end(&mut header_bytes)?;
        let header = Header::from_bytes(&header_bytes)?;

        let index_len = header.index_table_len();
        let index_end = header.index_offset as u64 + index_len as u64;
        if index_end > file_len {
            return Err(Error::DataTooShort {
                needed: index_end as usize,
                actual: file_len as usize,
            });
        }

        reader.seek(SeekFrom::Start(header.index_offset as u64))?;
        let mut index_bytes = vec![0u8; index_len];
        reader.read_exact(&mut index_bytes)?;
        let entries = parse_index(
            &index_bytes,
            header.index_version,
            header.index_entry_count,
        )?;

        tracing::debug!(
            entries = entries.len(),
            version = %format!("{}.{}", header.major_version, header.minor_version),
            "Parsed DBPF index"
        );

        let mut dbpf = Self {
            reader,
            header,
            entries,
            directory: HashMap::new(),
            file_len,
        };

        if let Some(dir_entry) = dbpf.find(DIRECTORY_TGI).copied() {
            let data = dbpf.read_raw(&dir_entry)?;
            dbpf.directory = parse_directory(&data, dbpf.header.index_version);
            tracing::debug!(compressed = dbpf.directory.len(), "Parsed directory file");
        }

        Ok(dbpf)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// All index entries in file order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Find the first entry with the given TGI
    pub fn find(&self, tgi: Tgi) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.tgi == tgi)
    }

    /// Check if the directory file lists an entry as compressed
    pub fn is_compressed(&self, entry: &IndexEntry) -> bool {
        self.directory.contains_key(&entry.tgi)
    }

    /// Read an entry's stored bytes without decompressing
    pub fn read_raw(&mut self, entry: &IndexEntry) -> Result<Vec<u8>> {
        let end = entry.offset as u64 + entry.size as u64;
        if end > self.file_len {
            return Err(Error::EntryOutOfBounds {
                tgi: entry.tgi,
                offset: entry.offset,
                size: entry.size,
            });
        }

        self.reader.seek(SeekFrom::Start(entry.offset as u64))?;
        let mut data = vec![0u8; entry.size as usize];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    /// Read an entry, decompressing it if the directory lists it as compressed
    pub fn read(&mut self, entry: &IndexEntry) -> Result<Vec<u8>> {
        let raw = self.read_raw(entry)?;

        let Some(&expected) = self.directory.get(&entry.tgi) else {
            return Ok(raw);
        };

        if !qfs::is_compressed(&raw) {
            tracing::warn!(tgi = %entry.tgi, "Directory lists entry as compressed but it has no QFS header");
            return Ok(raw);
        }

        let header_size = qfs::decompressed_size(&raw)?;
        if header_size != expected as usize {
            tracing::warn!(
                tgi = %entry.tgi,
                expected,
                actual = header_size,
                "Directory size disagrees with QFS header"
            );
        }

        qfs::decompress(&raw)
    }
}
