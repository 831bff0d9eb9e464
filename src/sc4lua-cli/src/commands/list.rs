//! List command handler

use anyhow::{Context, Result};
use sc4lua::{list_scripts, DbpfArchive, ScriptEntry};
use std::path::Path;

/// Summary line naming the archive and its format version
pub fn format_heading(archive: &DbpfArchive) -> String {
    let header = archive.reader().header();
    format!(
        "{}: DBPF {}.{}, {} entries",
        archive.path().display(),
        header.major_version,
        header.minor_version,
        archive.reader().entries().len()
    )
}

/// Human-readable listing, one script per line
pub fn format_table(scripts: &[ScriptEntry]) -> String {
    let mut out = String::new();
    for s in scripts {
        out.push_str(&format!(
            "0x{:08X}/0x{:08X}/0x{:08X}  {:>8}  {}\n",
            s.type_id,
            s.group_id,
            s.instance_id,
            s.size,
            s.relative_path.display()
        ));
    }
    out.push_str(&format!("{} Lua scripts\n", scripts.len()));
    out
}

pub fn handle(archive_path: &Path, json: bool) -> Result<()> {
    let archive = DbpfArchive::open(archive_path)
        .with_context(|| format!("Failed to list {}", archive_path.display()))?;
    let scripts = list_scripts(&archive);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&scripts).context("Failed to serialize script list")?
        );
    } else {
        println!("{}", format_heading(&archive));
        print!("{}", format_table(&scripts));
    }

    Ok(())
}
