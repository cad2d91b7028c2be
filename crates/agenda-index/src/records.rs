use agenda_types::AgendaRow;
use serde::{Deserialize, Serialize};

use crate::{Error, Record, Result, Value};

/// Columns shared by the `session` and `subsession` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFields {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub session_title: String,
    pub location: String,
    pub description: String,
    /// Speaker cell as it appeared in the source row.
    pub speakers: String,
}

impl SessionFields {
    pub fn from_row(row: &AgendaRow) -> Self {
        Self {
            date: row.date.clone(),
            time_start: row.time_start.clone(),
            time_end: row.time_end.clone(),
            session_title: row.title.clone(),
            location: row.location.clone(),
            description: row.description.clone(),
            speakers: row.speakers.clone(),
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("date", self.date.as_str())
            .with("time_start", self.time_start.as_str())
            .with("time_end", self.time_end.as_str())
            .with("session_title", self.session_title.as_str())
            .with("location", self.location.as_str())
            .with("description", self.description.as_str())
            .with("speakers", self.speakers.as_str())
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            date: text(record, "date")?,
            time_start: text(record, "time_start")?,
            time_end: text(record, "time_end")?,
            session_title: text(record, "session_title")?,
            location: text(record, "location")?,
            description: text(record, "description")?,
            speakers: text(record, "speakers")?,
        })
    }
}

/// Row of the `session` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    #[serde(flatten)]
    pub fields: SessionFields,
}

impl SessionRecord {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new().with("id", self.id);
        for (column, value) in self.fields.to_record().iter() {
            record.set(column, value.clone());
        }
        record
    }
}

/// Row of the `subsession` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSessionRecord {
    pub id: i64,
    /// Owning session.
    pub session_parent_id: i64,
    #[serde(flatten)]
    pub fields: SessionFields,
}

impl SubSessionRecord {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new().with("id", self.id);
        for (column, value) in self.fields.to_record().iter() {
            record.set(column, value.clone());
        }
        record.with("session_parent_id", self.session_parent_id)
    }
}

/// What a speaker row points at. Exactly one of the two foreign keys is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerLink {
    Session(i64),
    SubSession(i64),
}

impl SpeakerLink {
    fn columns(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            SpeakerLink::Session(id) => (Some(id), None),
            SpeakerLink::SubSession(id) => (None, Some(id)),
        }
    }
}

/// Row of the `speaker` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRecord {
    pub id: i64,
    pub name: String,
    pub session_id: Option<i64>,
    pub subsession_id: Option<i64>,
}

impl SpeakerRecord {
    pub fn new_record(name: &str, link: SpeakerLink) -> Record {
        let (session_id, subsession_id) = link.columns();
        Record::new()
            .with("name", name)
            .with("session_id", session_id)
            .with("subsession_id", subsession_id)
    }

    pub fn link(&self) -> Option<SpeakerLink> {
        match (self.session_id, self.subsession_id) {
            (Some(id), None) => Some(SpeakerLink::Session(id)),
            (None, Some(id)) => Some(SpeakerLink::SubSession(id)),
            _ => None,
        }
    }
}

impl TryFrom<Record> for SessionRecord {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        Ok(Self {
            id: integer(&record, "id")?,
            fields: SessionFields::from_record(&record)?,
        })
    }
}

impl TryFrom<Record> for SubSessionRecord {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        Ok(Self {
            id: integer(&record, "id")?,
            session_parent_id: integer(&record, "session_parent_id")?,
            fields: SessionFields::from_record(&record)?,
        })
    }
}

impl TryFrom<Record> for SpeakerRecord {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        Ok(Self {
            id: integer(&record, "id")?,
            name: text(&record, "name")?,
            session_id: optional_integer(&record, "session_id")?,
            subsession_id: optional_integer(&record, "subsession_id")?,
        })
    }
}

fn integer(record: &Record, column: &str) -> Result<i64> {
    optional_integer(record, column)?
        .ok_or_else(|| Error::Decode(format!("column '{}' is NULL", column)))
}

fn optional_integer(record: &Record, column: &str) -> Result<Option<i64>> {
    match record.get(column) {
        Some(Value::Integer(i)) => Ok(Some(*i)),
        Some(Value::Null) => Ok(None),
        Some(other) => Err(Error::Decode(format!(
            "column '{}' holds {} instead of an integer",
            column, other
        ))),
        None => Err(Error::Decode(format!("column '{}' missing from row", column))),
    }
}

// NULL reads back as an empty string; numeric cells (spreadsheet dates and
// times) are rendered as text.
fn text(record: &Record, column: &str) -> Result<String> {
    match record.get(column) {
        Some(Value::Text(s)) => Ok(s.clone()),
        Some(Value::Null) => Ok(String::new()),
        Some(Value::Integer(i)) => Ok(i.to_string()),
        Some(Value::Real(r)) => Ok(r.to_string()),
        Some(Value::Blob(_)) => Err(Error::Decode(format!("column '{}' holds a blob", column))),
        None => Err(Error::Decode(format!("column '{}' missing from row", column))),
    }
}
