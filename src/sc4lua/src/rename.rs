//! On-disk file index and renaming

use std::fs;
use std::path::{Path, PathBuf};

use crate::caseless::CaselessMap;
use crate::recover::RecoveryMap;
use crate::script;
use crate::{Error, Result};

/// Case-insensitive file name -> path index of a directory tree
///
/// The tree is walked in file-name order. When the same name appears in
/// several directories, the last one walked wins.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    files: CaselessMap<PathBuf>,
}

impl FileIndex {
    /// Index every file under `root`, recursively
    pub fn scan(root: &Path) -> Result<Self> {
        let mut files = CaselessMap::new();

        for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                Error::fs(&path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if let Some(previous) = files.insert(&name, entry.path().to_path_buf()) {
                tracing::warn!(
                    name = %name,
                    kept = %entry.path().display(),
                    dropped = %previous.display(),
                    "Duplicate file name in extracted scripts"
                );
            }
        }

        Ok(Self { files })
    }

    /// Path of a file by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.files.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Indexed paths in file-name order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(_, p)| p.as_path())
    }
}

/// Rename every indexed file that has a recovered name
///
/// Each file is moved to its original name within its own directory,
/// replacing any file already there. Names with no indexed file are skipped.
///
/// Returns the number of files renamed.
pub fn apply_renames(index: &FileIndex, names: &RecoveryMap) -> Result<usize> {
    let mut renamed = 0;

    for (hashed, original) in names.iter() {
        let Some(source) = index.get(hashed) else {
            continue;
        };

        let target_name = script::file_name(original);
        if target_name.is_empty() {
            continue;
        }

        let target = match source.parent() {
            Some(dir) => dir.join(target_name),
            None => PathBuf::from(target_name),
        };

        fs::rename(source, &target).map_err(|e| Error::fs(source, e))?;
        tracing::debug!(from = %hashed, to = %target_name, "Renamed script");

        renamed += 1;
    }

    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_scan_indexes_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("FF000001.lua"), "");
        touch(&dir.path().join("advisor/FF000002.lua"), "");
        touch(&dir.path().join("automata/deep/FF000003.lua"), "");

        let index = FileIndex::scan(dir.path()).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get("ff000002.LUA"),
            Some(dir.path().join("advisor/FF000002.lua").as_path())
        );
        assert!(index.get("FF000004.lua").is_none());
    }

    #[test]
    fn test_scan_duplicate_names_last_walked_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("advisor/dup.lua"), "advisor");
        touch(&dir.path().join("automata/DUP.lua"), "automata");

        let index = FileIndex::scan(dir.path()).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get("dup.lua"),
            Some(dir.path().join("automata/DUP.lua").as_path())
        );
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(
            FileIndex::scan(&missing),
            Err(Error::FileSystem { path, .. }) if path == missing
        ));
    }

    #[test]
    fn test_apply_renames_in_place() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("advisor/FF40041D.lua"), "helper body");
        touch(&dir.path().join("advisor/helper.lua"), "stale");

        let index = FileIndex::scan(dir.path()).unwrap();
        let mut names = RecoveryMap::new();
        names.insert_if_absent("FF40041D.lua", "helper.lua");
        names.insert_if_absent("FF000000.lua", "absent.lua");

        let renamed = apply_renames(&index, &names).unwrap();

        assert_eq!(renamed, 1);
        assert!(!dir.path().join("advisor/FF40041D.lua").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("advisor/helper.lua")).unwrap(),
            "helper body"
        );
        assert!(!dir.path().join("absent.lua").exists());
    }

    #[test]
    fn test_apply_renames_strips_directories_from_target() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("automata/FF40041D.lua"), "x");

        let index = FileIndex::scan(dir.path()).unwrap();
        let mut names = RecoveryMap::new();
        names.insert_if_absent("FF40041D.lua", "scripts/helper.lua");

        assert_eq!(apply_renames(&index, &names).unwrap(), 1);
        assert!(dir.path().join("automata/helper.lua").is_file());
    }
}
