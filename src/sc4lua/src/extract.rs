//! Lua script extraction
//!
//! Scripts are written to `XXXXXXXX.lua` files named after their instance
//! id. Advisor and automata scripts go to subdirectories of the same name;
//! anything else lands in the output root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::ResourceArchive;
use crate::script::{instance_file_name, ScriptGroup, LUA_SCRIPT_TYPE_ID};
use crate::{Error, Result};

/// A Lua script entry and where extraction puts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptEntry {
    pub type_id: u32,
    pub group_id: u32,
    pub instance_id: u32,
    /// Stored size in bytes
    pub size: u32,
    pub group: ScriptGroup,
    /// Path relative to the output root
    pub relative_path: PathBuf,
}

/// List the Lua script entries of an archive without loading them
pub fn list_scripts<A: ResourceArchive + ?Sized>(archive: &A) -> Vec<ScriptEntry> {
    archive
        .entries()
        .into_iter()
        .filter(|e| e.tgi.type_id == LUA_SCRIPT_TYPE_ID)
        .map(|e| {
            let group = ScriptGroup::from_group_id(e.tgi.group_id);
            let file_name = instance_file_name(e.tgi.instance_id);
            let relative_path = match group.subdirectory() {
                Some(dir) => Path::new(dir).join(file_name),
                None => PathBuf::from(file_name),
            };

            ScriptEntry {
                type_id: e.tgi.type_id,
                group_id: e.tgi.group_id,
                instance_id: e.tgi.instance_id,
                size: e.size,
                group,
                relative_path,
            }
        })
        .collect()
}

/// Create a directory and its parents, succeeding if it already exists
pub(crate) fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::fs(path, e))
}

/// Extract every Lua script in the archive to `output_dir`
///
/// The `advisor` and `automata` subdirectories are always created. Existing
/// files are overwritten. The first entry that fails to load aborts the
/// extraction; files written before it are left in place.
///
/// Returns the number of files written.
pub fn extract_scripts<A: ResourceArchive + ?Sized>(
    archive: &mut A,
    output_dir: &Path,
) -> Result<usize> {
    create_dir(output_dir)?;
    for group in [ScriptGroup::Advisor, ScriptGroup::Automata] {
        if let Some(dir) = group.subdirectory() {
            create_dir(&output_dir.join(dir))?;
        }
    }

    let mut written = 0;

    for entry in archive.entries() {
        if entry.tgi.type_id != LUA_SCRIPT_TYPE_ID {
            continue;
        }

        let data = archive.load(&entry)?;

        let group = ScriptGroup::from_group_id(entry.tgi.group_id);
        let dir = match group.subdirectory() {
            Some(sub) => output_dir.join(sub),
            None => output_dir.to_path_buf(),
        };
        let path = dir.join(instance_file_name(entry.tgi.instance_id));

        fs::write(&path, &data).map_err(|e| Error::fs(&path, e))?;
        tracing::debug!(tgi = %entry.tgi, path = %path.display(), bytes = data.len(), "Wrote script");

        written += 1;
    }

    tracing::info!(written, output = %output_dir.display(), "Extracted Lua scripts");

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::script::{ADVISOR_GROUP_ID, AUTOMATA_GROUP_ID};
    use sc4lua_dbpf::Tgi;

    const OTHER_TYPE: u32 = 0x6534_284A;
    const OTHER_GROUP: u32 = 0x1234_5678;

    #[test]
    fn test_extract_single_advisor_script() {
        let out = tempfile::tempdir().unwrap();
        let mut archive = MemoryArchive::new();
        archive.push(Tgi::new(LUA_SCRIPT_TYPE_ID, ADVISOR_GROUP_ID, 1), "-- test");

        let written = extract_scripts(&mut archive, out.path()).unwrap();

        assert_eq!(written, 1);
        let path = out.path().join("advisor").join("00000001.lua");
        assert_eq!(fs::read_to_string(path).unwrap(), "-- test");
        assert!(out.path().join("automata").is_dir());
        assert_eq!(fs::read_dir(out.path().join("automata")).unwrap().count(), 0);
    }

    #[test]
    fn test_extract_partitions_by_group_and_skips_other_types() {
        let out = tempfile::tempdir().unwrap();
        let mut archive = MemoryArchive::new();
        archive
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, ADVISOR_GROUP_ID, 0xFF00_0001), "a")
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, AUTOMATA_GROUP_ID, 0xFF00_0002), "b")
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, OTHER_GROUP, 0xABCDEF), "c")
            .push(Tgi::new(OTHER_TYPE, ADVISOR_GROUP_ID, 0xFF00_0003), "not lua");

        let written = extract_scripts(&mut archive, out.path()).unwrap();

        assert_eq!(written, 3);
        assert!(out.path().join("advisor/FF000001.lua").is_file());
        assert!(out.path().join("automata/FF000002.lua").is_file());
        assert!(out.path().join("00ABCDEF.lua").is_file());
        assert!(!out.path().join("advisor/FF000003.lua").exists());
    }

    #[test]
    fn test_extract_overwrites_and_is_repeatable() {
        let out = tempfile::tempdir().unwrap();
        let path = out.path().join("advisor/00000001.lua");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale contents").unwrap();

        let mut archive = MemoryArchive::new();
        archive.push(Tgi::new(LUA_SCRIPT_TYPE_ID, ADVISOR_GROUP_ID, 1), "fresh");

        assert_eq!(extract_scripts(&mut archive, out.path()).unwrap(), 1);
        assert_eq!(extract_scripts(&mut archive, out.path()).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_extract_creates_missing_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("nested/scripts");

        let written = extract_scripts(&mut MemoryArchive::new(), &out).unwrap();

        assert_eq!(written, 0);
        assert!(out.join("advisor").is_dir());
        assert!(out.join("automata").is_dir());
    }

    #[test]
    fn test_extract_aborts_on_decode_error() {
        let out = tempfile::tempdir().unwrap();
        let bad = Tgi::new(LUA_SCRIPT_TYPE_ID, AUTOMATA_GROUP_ID, 2);
        let mut archive = MemoryArchive::new();
        archive
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, ADVISOR_GROUP_ID, 1), "ok")
            .push_compressed(bad, b"garbage".to_vec())
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, ADVISOR_GROUP_ID, 3), "never written");

        let err = extract_scripts(&mut archive, out.path()).unwrap_err();

        assert!(matches!(err, Error::EntryDecode { tgi, .. } if tgi == bad));
        // Earlier output is kept
        assert!(out.path().join("advisor/00000001.lua").is_file());
        assert!(!out.path().join("advisor/00000003.lua").exists());
    }

    #[test]
    fn test_extract_output_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("taken");
        fs::write(&out, "file").unwrap();

        let err = extract_scripts(&mut MemoryArchive::new(), &out).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_list_scripts() {
        let mut archive = MemoryArchive::new();
        archive
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, AUTOMATA_GROUP_ID, 0xFFE6_C952), "-- x")
            .push(Tgi::new(OTHER_TYPE, OTHER_GROUP, 1), "")
            .push(Tgi::new(LUA_SCRIPT_TYPE_ID, OTHER_GROUP, 2), "");

        let scripts = list_scripts(&archive);

        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].group, ScriptGroup::Automata);
        assert_eq!(scripts[0].size, 4);
        assert_eq!(scripts[0].relative_path, Path::new("automata").join("FFE6C952.lua"));
        assert_eq!(scripts[1].group, ScriptGroup::Other);
        assert_eq!(scripts[1].relative_path, PathBuf::from("00000002.lua"));

        let json = serde_json::to_value(&scripts[0]).unwrap();
        assert_eq!(json["group"], "automata");
        assert_eq!(json["instance_id"], 0xFFE6_C952u32);
    }
}
