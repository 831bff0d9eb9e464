//! Extract command handler

use anyhow::{Context, Result};
use sc4lua::{write_scripts_to_directory, ExtractionSummary, RecoveryMode};
use std::path::Path;

/// Lines printed after a run
pub fn summary_lines(archive: &Path, summary: &ExtractionSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Extracted {} Lua files from {}",
        summary.written,
        archive.display()
    )];
    if summary.renamed > 0 {
        lines.push(format!("Renamed {} Maxis Lua files.", summary.renamed));
    }
    lines
}

pub fn handle(archive: &Path, output: &Path, recovery: RecoveryMode) -> Result<()> {
    tracing::debug!(archive = %archive.display(), ?recovery, "Starting extraction");

    let summary = write_scripts_to_directory(archive, output, recovery).with_context(|| {
        format!(
            "Failed to extract Lua scripts from {} to {}",
            archive.display(),
            output.display()
        )
    })?;

    for line in summary_lines(archive, &summary) {
        println!("{}", line);
    }

    Ok(())
}
