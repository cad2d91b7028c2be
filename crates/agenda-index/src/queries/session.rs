use std::collections::BTreeSet;

use crate::records::{SessionFields, SessionRecord};
use crate::{Predicate, Record, Result, Table};

pub fn insert(table: &Table<'_>, fields: &SessionFields) -> Result<i64> {
    table.insert(&fields.to_record())
}

pub fn find(table: &Table<'_>, filters: &Record) -> Result<Vec<SessionRecord>> {
    super::decode_all(table.select(&[], filters, &[])?)
}

pub fn get_by_id(table: &Table<'_>, id: i64) -> Result<Option<SessionRecord>> {
    Ok(find(table, &Record::new().with("id", id))?.into_iter().next())
}

pub fn by_ids(table: &Table<'_>, ids: &BTreeSet<i64>) -> Result<Vec<SessionRecord>> {
    let mut sessions: Vec<SessionRecord> = super::decode_all(table.select(
        &[],
        &Record::new(),
        &[Predicate::is_in("id", ids.iter().copied())],
    )?)?;
    sessions.sort_by_key(|s| s.id);
    Ok(sessions)
}
