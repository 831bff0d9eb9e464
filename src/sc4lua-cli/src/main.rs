mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::*;

const DEFAULT_LOG_FILTER: &str = "sc4lua=info,sc4lua_dbpf=warn";
const VERBOSE_LOG_FILTER: &str = "sc4lua=debug,sc4lua_dbpf=debug";

/// Pick the log filter: --log / SC4LUA_LOG, then RUST_LOG, then the defaults
fn log_filter(log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = log {
        return EnvFilter::new(directives);
    }

    let default = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(log_filter(cli.log.as_deref(), cli.verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Extract {
            archive,
            output,
            recover,
        } => {
            commands::extract::handle(&archive, &output, recover.into())?;
        }

        Commands::Hash { names, file_name } => {
            commands::hash::handle(&names, file_name);
        }

        Commands::List { archive, json } => {
            commands::list::handle(&archive, json)?;
        }
    }

    Ok(())
}
