use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Columns a lookup may filter on.
///
/// Every variant except [`LookupColumn::Speaker`] maps one-to-one onto a
/// column shared by the `session` and `subsession` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupColumn {
    Date,
    TimeStart,
    TimeEnd,
    SessionTitle,
    Location,
    Description,
    Speaker,
}

impl LookupColumn {
    pub const ALL: [LookupColumn; 7] = [
        LookupColumn::Date,
        LookupColumn::TimeStart,
        LookupColumn::TimeEnd,
        LookupColumn::SessionTitle,
        LookupColumn::Location,
        LookupColumn::Description,
        LookupColumn::Speaker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupColumn::Date => "date",
            LookupColumn::TimeStart => "time_start",
            LookupColumn::TimeEnd => "time_end",
            LookupColumn::SessionTitle => "session_title",
            LookupColumn::Location => "location",
            LookupColumn::Description => "description",
            LookupColumn::Speaker => "speaker",
        }
    }

    /// Name of the session/subsession column this criterion filters, or
    /// `None` for speaker criteria which go through the speaker table.
    pub fn session_column(&self) -> Option<&'static str> {
        match self {
            LookupColumn::Speaker => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for LookupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LookupColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| Error::UnknownColumn(s.to_string()))
    }
}

/// Ordered column/value pairs combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pairs: Vec<(LookupColumn, String)>,
}

impl Criteria {
    pub fn new(pairs: Vec<(LookupColumn, String)>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::EmptyCriteria);
        }

        for (i, (column, _)) in pairs.iter().enumerate() {
            if pairs[..i].iter().any(|(seen, _)| seen == column) {
                return Err(Error::DuplicateColumn(column.to_string()));
            }
        }

        Ok(Self { pairs })
    }

    /// Parse the comma separated column and value lists given on the command
    /// line. Values are trimmed and stripped of surrounding quotes.
    pub fn parse(columns: &str, values: &str) -> Result<Self> {
        if columns.trim().is_empty() {
            return Err(Error::EmptyCriteria);
        }

        let columns: Vec<&str> = columns.split(',').map(str::trim).collect();
        let values: Vec<String> = values.split(',').map(clean_value).collect();

        if columns.len() != values.len() {
            return Err(Error::CriteriaMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }

        let pairs = columns
            .into_iter()
            .map(str::parse::<LookupColumn>)
            .zip(values)
            .map(|(column, value)| column.map(|c| (c, value)))
            .collect::<Result<Vec<_>>>()?;

        Self::new(pairs)
    }

    pub fn pairs(&self) -> &[(LookupColumn, String)] {
        &self.pairs
    }

    pub fn speaker(&self) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(column, _)| *column == LookupColumn::Speaker)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_speaker_lookup(&self) -> bool {
        self.speaker().is_some()
    }

    /// Non-speaker criteria as (session column, value) equality filters.
    pub fn attribute_filters(&self) -> Vec<(&'static str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(column, value)| column.session_column().map(|c| (c, value.as_str())))
            .collect()
    }

    /// Values joined for summary lines ("Hall A, 2024-01-01").
    pub fn values_label(&self) -> String {
        self.pairs
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// Only a matching pair of surrounding quotes is removed.
fn clean_value(raw: &str) -> String {
    let value = raw.trim();
    let unquoted = ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)));
    unquoted.unwrap_or(value).trim().to_string()
}
