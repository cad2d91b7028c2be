use super::args::{Cli, Commands};
use super::handlers;
use crate::types::LogLevel;
use agenda_runtime::Config;
use agenda_runtime::config::DEFAULT_CONFIG_NAME;
use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME));
    let mut config = Config::load_from(&config_path)?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match cli.command {
        Commands::Import {
            file,
            header_rows,
            skip_failed,
        } => {
            if let Some(rows) = header_rows {
                config.header_rows = rows;
            }
            if skip_failed {
                config.skip_failed_inserts = true;
            }
            handlers::import::handle(&config, &file, cli.format)
        }

        Commands::Lookup { columns, values } => {
            handlers::lookup::handle(&config, &columns, &values, cli.format)
        }
    }
}
