//! Original file name recovery for the scripts shipped with the game
//!
//! Maxis scripts load each other with `dofile("name.lua")` and many start
//! with a `-- name.lua` header comment. Hashing every name found this way
//! predicts which `XXXXXXXX.lua` file it belongs to. Names that appear in no
//! script come from [`FALLBACK_NAMES`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::caseless::CaselessMap;
use crate::rename::{apply_renames, FileIndex};
use crate::script::{has_lua_extension, hashed_file_name};
use crate::{Error, Result};

/// File name of the archive that ships the Maxis scripts
pub const MAXIS_ARCHIVE_NAME: &str = "SimCity_1.dat";

/// Names that no script refers to
///
/// `adv_ep1_fluffnews.lua` and `examples.lua` hash to their keys.
/// `_adv_startup.lua` and `_scripting_conventions.lua` were chosen from the
/// file contents; their true names are unknown.
pub const FALLBACK_NAMES: [(&str, &str); 4] = [
    ("FF1A27EC.lua", "adv_ep1_fluffnews.lua"),
    ("FF8085FD.lua", "_adv_startup.lua"),
    ("FFAEC42B.lua", "_scripting_conventions.lua"),
    ("FFE6C952.lua", "examples.lua"),
];

const QUOTES: [char; 2] = ['"', '\''];

/// Check if an archive path names the Maxis script archive (ignoring case)
pub fn is_maxis_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.eq_ignore_ascii_case(MAXIS_ARCHIVE_NAME))
        .unwrap_or(false)
}

/// Script file name referenced by a single line, if any
///
/// - `dofile('name.lua')` / `dofile("name.lua")`: the text between the first
///   and last quote on the line
/// - `-- name.lua`: the comment text, unless it contains a space (prose that
///   merely mentions a file)
pub fn candidate_from_line(line: &str) -> Option<&str> {
    if line.contains("dofile") {
        let start = line.find(QUOTES)?;
        let end = line.rfind(QUOTES)?;
        if end <= start {
            return None;
        }

        let name = &line[start + 1..end];
        return has_lua_extension(name).then_some(name);
    }

    if line.starts_with("--") {
        let name = line.trim_start_matches('-').trim();
        if has_lua_extension(name) && !name.contains(' ') {
            return Some(name);
        }
    }

    None
}

/// Distinct candidate names in discovery order, compared ignoring case
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name unless an equal one (ignoring case) is present
    pub fn insert(&mut self, name: &str) -> bool {
        if !self.seen.insert(name.to_lowercase()) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Add every candidate referenced by a script's text
    pub fn scan_text(&mut self, text: &str) {
        for line in text.split(['\n', '\r']) {
            if let Some(name) = candidate_from_line(line) {
                self.insert(name);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Hashed file name -> original file name
///
/// The first name inserted for a key is kept.
#[derive(Debug, Clone, Default)]
pub struct RecoveryMap {
    names: CaselessMap<String>,
}

impl RecoveryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each candidate to the file name its hash produces
    pub fn from_candidates(candidates: &CandidateSet) -> Self {
        let mut map = Self::new();
        for name in candidates.iter() {
            map.insert_if_absent(&hashed_file_name(name), name);
        }
        map
    }

    /// Add the fixed names for keys not already recovered
    pub fn add_fallbacks(&mut self) {
        for (hashed, original) in FALLBACK_NAMES {
            self.insert_if_absent(hashed, original);
        }
    }

    pub fn insert_if_absent(&mut self, hashed: &str, original: impl Into<String>) -> bool {
        self.names.insert_if_absent(hashed, original.into())
    }

    pub fn get(&self, hashed: &str) -> Option<&str> {
        self.names.get(hashed).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Decode script bytes: UTF-16 when a UTF-16 BOM is present, otherwise
/// UTF-8 with invalid sequences replaced. The BOM is dropped.
fn decode_script_text(bytes: &[u8]) -> String {
    let utf16 = |data: &[u8], read: fn([u8; 2]) -> u16| {
        let units: Vec<u16> = data.chunks_exact(2).map(|c| read([c[0], c[1]])).collect();
        String::from_utf16_lossy(&units)
    };

    match bytes {
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        _ => {
            let text = String::from_utf8_lossy(bytes);
            text.strip_prefix('\u{FEFF}').unwrap_or(&*text).to_string()
        }
    }
}

fn read_script_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::fs(path, e))?;
    Ok(decode_script_text(&bytes))
}

/// Scan every indexed file and build the recovery map, fallbacks last
pub fn build_recovery_map(files: &FileIndex) -> Result<RecoveryMap> {
    let mut candidates = CandidateSet::new();
    for path in files.paths() {
        candidates.scan_text(&read_script_text(path)?);
    }

    tracing::debug!(candidates = candidates.len(), "Collected candidate names");

    let mut map = RecoveryMap::from_candidates(&candidates);
    map.add_fallbacks();
    Ok(map)
}

/// Recover original names for the scripts extracted to `output_dir`
///
/// Returns the number of files renamed.
pub fn recover_names(output_dir: &Path) -> Result<usize> {
    let files = FileIndex::scan(output_dir)?;
    let names = build_recovery_map(&files)?;
    let renamed = apply_renames(&files, &names)?;

    tracing::info!(renamed, known = names.len(), "Recovered script names");

    Ok(renamed)
}
