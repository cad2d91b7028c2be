pub mod session;
pub mod speaker;
pub mod subsession;

use std::collections::BTreeSet;

use crate::{Record, Result, Table};

pub(crate) fn decode_all<T>(records: Vec<Record>) -> Result<Vec<T>>
where
    T: TryFrom<Record, Error = crate::Error>,
{
    records.into_iter().map(T::try_from).collect()
}

/// Ids of rows matching every equality filter.
pub(crate) fn ids_matching(table: &Table<'_>, filters: &Record) -> Result<BTreeSet<i64>> {
    Ok(table
        .select(&["id"], filters, &[])?
        .iter()
        .filter_map(|record| record.get("id").and_then(|v| v.as_i64()))
        .collect())
}
