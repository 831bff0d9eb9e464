//! Lua script resource ids and file name hashing
//!
//! The game assigns every Lua script an instance id derived from its file
//! name:
//!
//! 1. Take the file name without directory and extension.
//! 2. Hash it with the 24-bit CRC (case-sensitive).
//! 3. OR the hash with `0xFF000000`.

use serde::Serialize;

use crate::hash::crc24;

/// DBPF type id of Lua scripts
pub const LUA_SCRIPT_TYPE_ID: u32 = 0xCA63_E2A3;

/// Group id of advisor scripts
pub const ADVISOR_GROUP_ID: u32 = 0x4A5E_8EF6;

/// Group id of automata scripts
pub const AUTOMATA_GROUP_ID: u32 = 0x4A5E_8F3F;

/// Tag byte placed above the 24-bit name hash
pub const LUA_INSTANCE_TAG: u32 = 0xFF00_0000;

/// Extension of extracted script files
pub const LUA_EXTENSION: &str = ".lua";

/// Script group, which decides the extraction subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptGroup {
    Advisor,
    Automata,
    Other,
}

impl ScriptGroup {
    pub fn from_group_id(group_id: u32) -> Self {
        match group_id {
            ADVISOR_GROUP_ID => Self::Advisor,
            AUTOMATA_GROUP_ID => Self::Automata,
            _ => Self::Other,
        }
    }

    /// Subdirectory of the output root, `None` for the root itself
    pub fn subdirectory(self) -> Option<&'static str> {
        match self {
            Self::Advisor => Some("advisor"),
            Self::Automata => Some("automata"),
            Self::Other => None,
        }
    }
}

/// File name component of a path, accepting both `/` and `\` separators
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// File name without directory and without the last extension
///
/// `"dir/Foo.LUA"` -> `"Foo"`, `"a.b.lua"` -> `"a.b"`, `".lua"` -> `""`
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}

/// Instance id the game assigns to a script with this file name
///
/// # Example
///
/// ```
/// use sc4lua::file_name_hash;
///
/// assert_eq!(file_name_hash("examples.lua"), 0xFFE6C952);
/// ```
pub fn file_name_hash(file_name: &str) -> u32 {
    LUA_INSTANCE_TAG | crc24(file_stem(file_name), false)
}

/// Extracted file name for an instance id: `XXXXXXXX.lua`
pub fn instance_file_name(instance_id: u32) -> String {
    format!("{:08X}{}", instance_id, LUA_EXTENSION)
}

/// Extracted file name a script with this original name ends up under
pub fn hashed_file_name(file_name: &str) -> String {
    instance_file_name(file_name_hash(file_name))
}

/// Check for a `.lua` suffix, ignoring ASCII case
pub fn has_lua_extension(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= LUA_EXTENSION.len()
        && bytes[bytes.len() - LUA_EXTENSION.len()..].eq_ignore_ascii_case(LUA_EXTENSION.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_hash_known() {
        assert_eq!(file_name_hash("examples.lua"), 0xFFE6_C952);
        assert_eq!(file_name_hash("adv_ep1_fluffnews.lua"), 0xFF1A_27EC);
        assert_eq!(file_name_hash("helper.lua"), 0xFF40_041D);
    }

    #[test]
    fn test_fallback_guesses_are_not_preimages() {
        // These two names were picked from file contents, their hashes differ
        // from the instance ids they are mapped to
        assert_eq!(file_name_hash("_adv_startup.lua"), 0xFF9D_5183);
        assert_eq!(file_name_hash("_scripting_conventions.lua"), 0xFFA9_FFC7);
    }

    #[test]
    fn test_file_name_hash_tag_byte() {
        for name in ["", "a", "x.lua", "some/deep/path/name.txt", "\u{1F600}.lua"] {
            assert_eq!(file_name_hash(name) & 0xFF00_0000, LUA_INSTANCE_TAG, "{name}");
        }
    }

    #[test]
    fn test_file_name_hash_ignores_directory_and_extension() {
        assert_eq!(file_name_hash("dir/Foo.LUA"), file_name_hash("Foo.lua"));
        assert_eq!(file_name_hash("dir\\sub\\Foo.lua"), file_name_hash("Foo"));
        assert_ne!(file_name_hash("Foo.lua"), file_name_hash("foo.lua"));
    }

    #[test]
    fn test_file_name_hash_empty_stem() {
        assert_eq!(file_name_hash(""), 0xFFB7_04CE);
        assert_eq!(file_name_hash(".lua"), 0xFFB7_04CE);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("dir/Foo.LUA"), "Foo");
        assert_eq!(file_stem("a.b.lua"), "a.b");
        assert_eq!(file_stem("noext"), "noext");
        assert_eq!(file_stem("trailing."), "trailing");
        assert_eq!(file_stem("c:\\scripts\\main.lua"), "main");
    }

    #[test]
    fn test_hashed_file_name() {
        assert_eq!(hashed_file_name("examples.lua"), "FFE6C952.lua");
        assert_eq!(instance_file_name(1), "00000001.lua");
        assert_eq!(instance_file_name(0xABCDEF), "00ABCDEF.lua");
    }

    #[test]
    fn test_has_lua_extension() {
        assert!(has_lua_extension("a.lua"));
        assert!(has_lua_extension("A.LuA"));
        assert!(has_lua_extension(".lua"));
        assert!(!has_lua_extension("lua"));
        assert!(!has_lua_extension("a.luac"));
        assert!(!has_lua_extension("\u{E9}"));
    }

    #[test]
    fn test_script_group() {
        assert_eq!(ScriptGroup::from_group_id(ADVISOR_GROUP_ID), ScriptGroup::Advisor);
        assert_eq!(ScriptGroup::from_group_id(AUTOMATA_GROUP_ID), ScriptGroup::Automata);
        assert_eq!(ScriptGroup::from_group_id(0), ScriptGroup::Other);
        assert_eq!(ScriptGroup::Advisor.subdirectory(), Some("advisor"));
        assert_eq!(ScriptGroup::Other.subdirectory(), None);
    }
}
