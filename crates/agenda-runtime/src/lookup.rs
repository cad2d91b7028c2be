use agenda_index::{Database, Record, SessionRecord, SpeakerLink, SubSessionRecord};
use agenda_types::Criteria;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::Result;

/// A session or sub-session returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupHit {
    Session(SessionRecord),
    SubSession(SubSessionRecord),
}

impl LookupHit {
    pub fn id(&self) -> i64 {
        match self {
            LookupHit::Session(s) => s.id,
            LookupHit::SubSession(s) => s.id,
        }
    }

    pub fn to_record(&self) -> Record {
        match self {
            LookupHit::Session(s) => s.to_record(),
            LookupHit::SubSession(s) => s.to_record(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Filter sessions by their own columns and expand their sub-sessions.
    Attribute,
    /// Resolve a speaker's links, optionally narrowed by attribute filters.
    Speaker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub mode: LookupMode,
    pub criteria: Criteria,
    pub hits: Vec<LookupHit>,
}

impl LookupResult {
    pub fn count(&self) -> usize {
        self.hits.len()
    }

    /// Closing line printed after the hits.
    pub fn summary(&self) -> String {
        match (self.mode, self.criteria.speaker()) {
            (LookupMode::Speaker, Some(speaker)) => {
                format!("{} attended {} sessions in total", speaker, self.count())
            }
            _ => format!(
                "{} have {} record(s) in total",
                self.criteria.values_label(),
                self.count()
            ),
        }
    }
}

pub struct LookupService<'a> {
    db: &'a Database,
}

impl<'a> LookupService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn run(&self, criteria: &Criteria) -> Result<LookupResult> {
        let filters: Record = criteria.attribute_filters().into_iter().collect();

        let (mode, hits) = match criteria.speaker() {
            Some(speaker) => (LookupMode::Speaker, self.by_speaker(speaker, &filters)?),
            None => (LookupMode::Attribute, self.by_attributes(&filters)?),
        };

        debug!(?mode, hits = hits.len(), "lookup finished");
        Ok(LookupResult {
            mode,
            criteria: criteria.clone(),
            hits,
        })
    }

    fn by_attributes(&self, filters: &Record) -> Result<Vec<LookupHit>> {
        let mut sessions = self.db.find_sessions(filters)?;
        sessions.sort_by_key(|s| s.id);

        let mut hits = Vec::new();
        for session in sessions {
            let children = self.db.subsessions_of(session.id)?;
            hits.push(LookupHit::Session(session));
            hits.extend(children.into_iter().map(LookupHit::SubSession));
        }
        Ok(hits)
    }

    fn by_speaker(&self, speaker: &str, filters: &Record) -> Result<Vec<LookupHit>> {
        // Session and sub-session ids come from separate sequences and may
        // coincide, so they are never mixed.
        let mut session_ids = BTreeSet::new();
        let mut subsession_ids = BTreeSet::new();
        for record in self.db.speakers_named(speaker)? {
            match record.link() {
                Some(SpeakerLink::Session(id)) => {
                    session_ids.insert(id);
                }
                Some(SpeakerLink::SubSession(id)) => {
                    subsession_ids.insert(id);
                }
                None => debug!(speaker_id = record.id, "speaker row without a link"),
            }
        }

        if !filters.is_empty() {
            let matching = self.db.session_ids_matching(filters)?;
            session_ids.retain(|id| matching.contains(id));

            let matching = self.db.subsession_ids_matching(filters)?;
            subsession_ids.retain(|id| matching.contains(id));
        }

        let mut hits = Vec::with_capacity(session_ids.len() + subsession_ids.len());
        if !session_ids.is_empty() {
            hits.extend(
                self.db
                    .sessions_by_ids(&session_ids)?
                    .into_iter()
                    .map(LookupHit::Session),
            );
        }
        if !subsession_ids.is_empty() {
            hits.extend(
                self.db
                    .subsessions_by_ids(&subsession_ids)?
                    .into_iter()
                    .map(LookupHit::SubSession),
            );
        }
        Ok(hits)
    }
}
