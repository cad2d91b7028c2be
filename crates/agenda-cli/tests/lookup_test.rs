mod common;
use common::TestFixture;
use predicates::prelude::*;

#[test]
fn test_speaker_lookup() {
    let fixture = TestFixture::new();
    fixture.import_sample().expect("Failed to import sample");

    let output = fixture
        .command()
        .arg("lookup")
        .arg("speaker")
        .arg("Alice")
        .output()
        .expect("Failed to run lookup");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1 {\"id\": 1,"));
    assert!(lines[0].contains("\"session_title\": \"Keynote\""));
    assert!(lines[1].starts_with("2 "));
    assert!(lines[1].contains("\"session_title\": \"Welcome\""));
    assert_eq!(lines[2], "Alice attended 2 sessions in total");
}

#[test]
fn test_attribute_lookup_with_two_criteria() {
    let fixture = TestFixture::new();
    fixture.import_sample().expect("Failed to import sample");

    fixture
        .command()
        .arg("lookup")
        .arg("location,date")
        .arg("'Hall A', 2024-01-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keynote"))
        .stdout(predicate::str::contains("Roadmap"))
        .stdout(predicate::str::contains("Closing").not())
        .stdout(predicate::str::contains(
            "Hall A, 2024-01-01 have 3 record(s) in total",
        ));
}

#[test]
fn test_lookup_json() {
    let fixture = TestFixture::new();
    fixture.import_sample().expect("Failed to import sample");

    let output = fixture
        .command()
        .arg("--format")
        .arg("json")
        .arg("lookup")
        .arg("speaker,location")
        .arg("Bob,Hall B")
        .output()
        .expect("Failed to run lookup");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Parse failed");
    assert_eq!(json["mode"], "speaker");
    assert_eq!(json["criteria"]["location"], "Hall B");
    assert_eq!(json["count"], 1);
    assert_eq!(json["hits"][0]["session_title"], "Panel");
}

#[test]
fn test_mismatched_criteria_exit_without_touching_database() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("lookup")
        .arg("location,date")
        .arg("Hall A")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "));

    assert!(!fixture.db_path().exists());
}

#[test]
fn test_unknown_column_is_rejected() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("lookup")
        .arg("room")
        .arg("Hall A")
        .assert()
        .failure()
        .stderr(predicate::str::contains("room"));

    assert!(!fixture.db_path().exists());
}
