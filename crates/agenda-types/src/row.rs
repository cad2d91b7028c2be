use serde::{Deserialize, Serialize};

/// Discriminator value that marks a top-level session
pub const DEFAULT_SESSION_MARKER: &str = "Session";

/// Whether an agenda row opens a new session or belongs to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Session,
    SubSession,
}

impl RowKind {
    /// Any discriminator other than the session marker is a sub-session.
    pub fn classify(discriminator: &str, session_marker: &str) -> Self {
        if discriminator.trim() == session_marker {
            RowKind::Session
        } else {
            RowKind::SubSession
        }
    }
}

/// One data row of the agenda sheet, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaRow {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    /// Raw discriminator cell ("Session", "Sub", ...)
    pub kind: String,
    pub title: String,
    pub location: String,
    pub description: String,
    /// Semicolon separated speaker names
    pub speakers: String,
}

impl AgendaRow {
    /// Build a row from positional cells. Missing trailing cells become empty
    /// strings and extra cells are ignored.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = fields.into_iter().map(Into::into);
        let mut next = || cells.next().unwrap_or_default();

        Self {
            date: next(),
            time_start: next(),
            time_end: next(),
            kind: next(),
            title: next(),
            location: next(),
            description: next(),
            speakers: next(),
        }
    }

    pub fn kind(&self, session_marker: &str) -> RowKind {
        RowKind::classify(&self.kind, session_marker)
    }

    pub fn speaker_names(&self) -> Vec<&str> {
        speaker_names(&self.speakers)
    }
}

/// Split a speaker cell on `;`, trimming names and dropping empty entries.
pub fn speaker_names(raw: &str) -> Vec<&str> {
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
