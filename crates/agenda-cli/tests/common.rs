//! Shared fixture for CLI integration tests.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Agenda export with two title rows above the data.
pub const AGENDA_CSV: &str = "\
Conference Agenda,,,,,,,
Day 1 and 2,,,,,,,
2024-01-01,09:00,10:00,Session,Keynote,Hall A,Opening talk,Alice
2024-01-01,09:10,09:40,Sub,Welcome,Hall A,,Alice; Bob
2024-01-01,09:40,10:00,Sub,Roadmap,Hall A,,Carol
2024-01-01,11:00,12:00,Session,Panel,Hall B,,Bob;Dana
2024-01-02,09:00,10:00,Session,Closing,Hall A,,
";

pub struct TestFixture {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("agenda.db");
        Self { temp_dir, db_path }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Command with the fixture database, run from inside the temp dir so a
    /// stray `agenda.toml` in the workspace is never picked up.
    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("agenda");
        cmd.current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(&self.db_path);
        cmd
    }

    pub fn import_sample(&self) -> anyhow::Result<()> {
        let csv = self.write_file("agenda.csv", AGENDA_CSV);
        let output = self
            .command()
            .arg("import")
            .arg(&csv)
            .arg("--header-rows")
            .arg("2")
            .output()?;

        if !output.status.success() {
            anyhow::bail!(
                "import failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(())
    }
}
