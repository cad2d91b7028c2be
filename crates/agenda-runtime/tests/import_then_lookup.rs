//! End-to-end: CSV export -> import -> lookup against a database file

use agenda_index::Database;
use agenda_runtime::{CsvRowSource, ImportOptions, ImportService, LookupMode, LookupService};
use agenda_types::Criteria;
use std::path::Path;
use tempfile::TempDir;

const AGENDA_CSV: &str = "\
Conference Agenda,,,,,,,
,,,,,,,
2024-01-01,09:00,10:00,Session,Keynote,Hall A,Opening talk,Alice
2024-01-01,09:10,09:40,Sub,Welcome,Hall A,,Alice; Bob
2024-01-01,09:40,10:00,Sub,Roadmap,Hall A,,Carol
2024-01-01,11:00,12:00,Session,Panel,Hall B,,Bob;Dana
2024-01-02,09:00,10:00,Session,Closing,Hall A,,
";

fn import(db_path: &Path, csv_path: &Path) {
    let db = Database::open(db_path).unwrap();
    let source = CsvRowSource::open(csv_path, 2).unwrap();
    let options = ImportOptions {
        first_row: source.first_row(),
        ..ImportOptions::default()
    };

    let summary = ImportService::new(&db, options)
        .run(source.rows(), |_| {})
        .unwrap();
    assert_eq!(summary.sessions, 3);
    assert_eq!(summary.subsessions, 2);
    assert_eq!(summary.speakers, 6);
    db.close().unwrap();
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("agenda.csv");
    std::fs::write(&csv_path, AGENDA_CSV).unwrap();
    let db_path = temp_dir.path().join("agenda.db");
    import(&db_path, &csv_path);
    (temp_dir, db_path)
}

#[test]
fn test_speaker_lookup_after_import() {
    let (_temp_dir, db_path) = setup();
    let db = Database::open(&db_path).unwrap();

    let criteria = Criteria::parse("speaker", "Bob").unwrap();
    let result = LookupService::new(&db).run(&criteria).unwrap();

    assert_eq!(result.mode, LookupMode::Speaker);
    assert_eq!(result.count(), 2);
    // Sessions first, then sub-sessions
    assert!(matches!(result.hits[0], agenda_runtime::LookupHit::Session(_)));
    assert!(matches!(result.hits[1], agenda_runtime::LookupHit::SubSession(_)));
    assert_eq!(result.summary(), "Bob attended 2 sessions in total");
}

#[test]
fn test_attribute_lookup_after_import() {
    let (_temp_dir, db_path) = setup();
    let db = Database::open(&db_path).unwrap();

    let criteria = Criteria::parse("location,date", "\"Hall A\",2024-01-01").unwrap();
    let result = LookupService::new(&db).run(&criteria).unwrap();

    // Keynote plus its two sub-sessions
    assert_eq!(result.count(), 3);
    assert_eq!(result.summary(), "Hall A, 2024-01-01 have 3 record(s) in total");
}

#[test]
fn test_reimport_appends() {
    let (temp_dir, db_path) = setup();
    import(&db_path, &temp_dir.path().join("agenda.csv"));

    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.sessions().count().unwrap(), 6);
}
