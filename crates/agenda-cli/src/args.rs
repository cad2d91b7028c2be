use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Import a conference agenda and look up its sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database file (overrides `db_path` from the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file; defaults to ./agenda.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import agenda rows from a CSV export of the agenda sheet
    Import {
        file: PathBuf,

        /// Rows to skip before the first agenda row
        #[arg(long)]
        header_rows: Option<usize>,

        /// Keep going when a row fails to insert
        #[arg(long)]
        skip_failed: bool,
    },

    /// Look up sessions, e.g. `lookup location,date "Hall A,2024-01-01"`
    Lookup {
        /// Comma separated columns: date, time_start, time_end,
        /// session_title, location, description, speaker
        columns: String,

        /// Comma separated values, paired with the columns by position
        values: String,
    },
}
