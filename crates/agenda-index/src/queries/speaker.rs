use crate::records::{SpeakerLink, SpeakerRecord};
use crate::{Record, Result, Table};

pub fn insert(table: &Table<'_>, name: &str, link: SpeakerLink) -> Result<i64> {
    table.insert(&SpeakerRecord::new_record(name, link))
}

pub fn find_by_name(table: &Table<'_>, name: &str) -> Result<Vec<SpeakerRecord>> {
    super::decode_all(table.select(&[], &Record::new().with("name", name), &[])?)
}

pub fn list(table: &Table<'_>) -> Result<Vec<SpeakerRecord>> {
    super::decode_all(table.select(&[], &Record::new(), &[])?)
}
