use crate::presentation;
use crate::types::OutputFormat;
use agenda_index::Database;
use agenda_runtime::{Config, CsvRowSource, ImportOptions, ImportProgress, ImportService};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub fn handle(config: &Config, file: &Path, format: OutputFormat) -> Result<()> {
    let source = CsvRowSource::open(file, config.header_rows)
        .with_context(|| format!("Failed to open agenda file {}", file.display()))?;
    let db = Database::open(&config.db_path)?;

    let mut skipped = Vec::new();
    let summary = ImportService::new(&db, ImportOptions::from(config)).run(
        source.rows(),
        |progress| match progress {
            ImportProgress::RowSkipped { row, reason } => skipped.push((row, reason)),
            other => debug!(?other, "import progress"),
        },
    )?;
    db.close()?;

    match format {
        OutputFormat::Plain => print!("{}", presentation::import_plain(&summary, &skipped)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&presentation::import_json(&summary, &skipped))?
        ),
    }
    Ok(())
}
