//! CLI argument definitions for sc4lua

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sc4lua")]
#[command(about = "Extract SimCity 4 Lua scripts and recover their file names", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug output (overridden by --log)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter directives, e.g. "sc4lua=trace"
    #[arg(long, global = true, env = "SC4LUA_LOG")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract every Lua script from a DBPF archive
    #[command(visible_alias = "x")]
    Extract {
        /// Path to the .dat archive
        archive: PathBuf,

        /// Output directory (created if missing)
        output: PathBuf,

        /// When to recover original file names
        #[arg(long, value_enum, default_value_t = RecoverMode::Auto)]
        recover: RecoverMode,
    },

    /// Print the Lua instance id for file names
    #[command(visible_alias = "h")]
    Hash {
        /// File names, e.g. "advisors.lua"
        #[arg(required = true)]
        names: Vec<String>,

        /// Print the extracted file name instead of the id
        #[arg(long)]
        file_name: bool,
    },

    /// List the Lua scripts in an archive without extracting
    #[command(visible_alias = "l")]
    List {
        /// Path to the .dat archive
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecoverMode {
    /// Only for SimCity_1.dat
    #[default]
    Auto,
    Always,
    Never,
}

impl From<RecoverMode> for sc4lua::RecoveryMode {
    fn from(mode: RecoverMode) -> Self {
        match mode {
            RecoverMode::Auto => Self::Auto,
            RecoverMode::Always => Self::Always,
            RecoverMode::Never => Self::Never,
        }
    }
}
