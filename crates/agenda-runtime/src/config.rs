use agenda_index::DEFAULT_DB_NAME;
use agenda_types::DEFAULT_SESSION_MARKER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "agenda.toml";

/// Rows above the first data row in the agenda sheet.
pub const DEFAULT_HEADER_ROWS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Number of leading rows to skip before agenda data starts.
    pub header_rows: usize,
    /// Discriminator value that marks a top-level session.
    pub session_marker: String,
    /// Skip rows whose insert fails instead of aborting the import.
    pub skip_failed_inserts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_NAME),
            header_rows: DEFAULT_HEADER_ROWS,
            session_marker: DEFAULT_SESSION_MARKER.to_string(),
            skip_failed_inserts: false,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
