//! Extraction followed by name recovery

use std::path::Path;

use crate::archive::DbpfArchive;
use crate::extract::extract_scripts;
use crate::recover::{is_maxis_archive, recover_names};
use crate::Result;

/// When to run name recovery after extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Only for the archive that ships the Maxis scripts
    #[default]
    Auto,
    Always,
    Never,
}

impl RecoveryMode {
    fn applies_to(self, archive_path: &Path) -> bool {
        match self {
            Self::Auto => is_maxis_archive(archive_path),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Outcome of [`write_scripts_to_directory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionSummary {
    pub written: usize,
    pub renamed: usize,
}

/// Extract the Lua scripts of a DBPF archive, then recover their names
pub fn write_scripts_to_directory(
    archive_path: &Path,
    output_dir: &Path,
    recovery: RecoveryMode,
) -> Result<ExtractionSummary> {
    let written = {
        let mut archive = DbpfArchive::open(archive_path)?;
        extract_scripts(&mut archive, output_dir)?
    };

    let renamed = if recovery.applies_to(archive_path) {
        recover_names(output_dir)?
    } else {
        tracing::debug!(archive = %archive_path.display(), "Skipping name recovery");
        0
    };

    Ok(ExtractionSummary { written, renamed })
}
