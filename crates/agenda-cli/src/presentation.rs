//! Plain text and JSON rendering of command results.
//!
//! Plain output goes to stdout line by line; logs never share the stream.

use agenda_runtime::{ImportSummary, LookupResult};
use serde_json::{Map, Value, json};
use std::fmt::Write;

pub fn import_plain(summary: &ImportSummary, skipped: &[(usize, String)]) -> String {
    let mut out = String::new();
    for (row, reason) in skipped {
        let _ = writeln!(out, "Row {} skipped: {}", row, reason);
    }
    let _ = writeln!(
        out,
        "Imported {} sessions, {} sub-sessions and {} speakers from {} rows",
        summary.sessions, summary.subsessions, summary.speakers, summary.rows
    );
    if summary.skipped > 0 {
        let _ = writeln!(out, "{} row(s) skipped", summary.skipped);
    }
    out
}

pub fn import_json(summary: &ImportSummary, skipped: &[(usize, String)]) -> Value {
    let skipped: Vec<Value> = skipped
        .iter()
        .map(|(row, reason)| json!({ "row": row, "reason": reason }))
        .collect();

    json!({
        "summary": summary,
        "skipped_rows": skipped,
    })
}

/// One `N {record}` line per hit, numbered from 1, then the summary line.
pub fn lookup_plain(result: &LookupResult) -> String {
    let mut out = String::new();
    for (i, hit) in result.hits.iter().enumerate() {
        let _ = writeln!(out, "{} {}", i + 1, hit.to_record());
    }
    let _ = writeln!(out, "{}", result.summary());
    out
}

pub fn lookup_json(result: &LookupResult) -> Value {
    let criteria: Map<String, Value> = result
        .criteria
        .pairs()
        .iter()
        .map(|(column, value)| (column.to_string(), Value::String(value.clone())))
        .collect();

    json!({
        "mode": result.mode,
        "criteria": criteria,
        "hits": result.hits,
        "count": result.count(),
    })
}
