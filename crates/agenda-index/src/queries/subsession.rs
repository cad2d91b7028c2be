use std::collections::BTreeSet;

use crate::records::{SessionFields, SubSessionRecord};
use crate::{Predicate, Record, Result, Table};

pub fn insert(table: &Table<'_>, session_parent_id: i64, fields: &SessionFields) -> Result<i64> {
    let record = fields
        .to_record()
        .with("session_parent_id", session_parent_id);
    table.insert(&record)
}

pub fn find(table: &Table<'_>, filters: &Record) -> Result<Vec<SubSessionRecord>> {
    super::decode_all(table.select(&[], filters, &[])?)
}

/// Sub-sessions owned by `session_parent_id`, in insertion order.
pub fn children_of(table: &Table<'_>, session_parent_id: i64) -> Result<Vec<SubSessionRecord>> {
    let mut children = find(
        table,
        &Record::new().with("session_parent_id", session_parent_id),
    )?;
    children.sort_by_key(|s| s.id);
    Ok(children)
}

pub fn by_ids(table: &Table<'_>, ids: &BTreeSet<i64>) -> Result<Vec<SubSessionRecord>> {
    let mut subsessions: Vec<SubSessionRecord> = super::decode_all(table.select(
        &[],
        &Record::new(),
        &[Predicate::is_in("id", ids.iter().copied())],
    )?)?;
    subsessions.sort_by_key(|s| s.id);
    Ok(subsessions)
}
