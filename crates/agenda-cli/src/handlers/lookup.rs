use crate::presentation;
use crate::types::OutputFormat;
use agenda_index::Database;
use agenda_runtime::{Config, LookupService};
use agenda_types::Criteria;
use anyhow::Result;

pub fn handle(config: &Config, columns: &str, values: &str, format: OutputFormat) -> Result<()> {
    // Bad criteria are reported before the database is opened
    let criteria = Criteria::parse(columns, values)?;

    let db = Database::open(&config.db_path)?;
    let result = LookupService::new(&db).run(&criteria)?;
    db.close()?;

    match format {
        OutputFormat::Plain => print!("{}", presentation::lookup_plain(&result)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&presentation::lookup_json(&result))?
        ),
    }
    Ok(())
}
