use agenda_index::{Database, SessionFields, SpeakerLink};
use agenda_types::{AgendaRow, DEFAULT_SESSION_MARKER, RowKind};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_HEADER_ROWS};
use crate::{Error, Result};

/// What to do when inserting a row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertFailurePolicy {
    /// Stop at the first failure; the whole run is rolled back.
    #[default]
    Abort,
    /// Log the failure, count the row as skipped and keep going.
    Skip,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub session_marker: String,
    pub policy: InsertFailurePolicy,
    /// Sheet row number of the first data row, used in messages.
    pub first_row: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            session_marker: DEFAULT_SESSION_MARKER.to_string(),
            policy: InsertFailurePolicy::Abort,
            first_row: DEFAULT_HEADER_ROWS + 1,
        }
    }
}

impl From<&Config> for ImportOptions {
    fn from(config: &Config) -> Self {
        Self {
            session_marker: config.session_marker.clone(),
            policy: if config.skip_failed_inserts {
                InsertFailurePolicy::Skip
            } else {
                InsertFailurePolicy::Abort
            },
            first_row: config.header_rows + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportProgress {
    Started,
    SessionInserted {
        row: usize,
        id: i64,
        speakers: usize,
    },
    SubSessionInserted {
        row: usize,
        id: i64,
        parent_id: i64,
        speakers: usize,
    },
    RowSkipped {
        row: usize,
        reason: String,
    },
    Completed(ImportSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub rows: usize,
    pub sessions: usize,
    pub subsessions: usize,
    pub speakers: usize,
    pub skipped: usize,
}

/// Session that sub-session rows currently attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentState {
    None,
    Active(i64),
    /// The last session row failed to insert under the skip policy.
    Failed,
}

pub struct ImportService<'a> {
    db: &'a Database,
    options: ImportOptions,
}

impl<'a> ImportService<'a> {
    pub fn new(db: &'a Database, options: ImportOptions) -> Self {
        Self { db, options }
    }

    /// Import `rows` in order inside a single transaction.
    ///
    /// Any error returned from here leaves the database as it was before the
    /// call. With [`InsertFailurePolicy::Skip`] failed inserts are reported
    /// through `on_progress` and the remaining rows are still committed.
    pub fn run<I, F>(&self, rows: I, mut on_progress: F) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = Result<AgendaRow>>,
        F: FnMut(ImportProgress),
    {
        info!(
            marker = %self.options.session_marker,
            policy = ?self.options.policy,
            "starting agenda import"
        );
        on_progress(ImportProgress::Started);

        let tx = self.db.transaction()?;
        let mut summary = ImportSummary::default();
        let mut parent = ParentState::None;

        for (offset, row) in rows.into_iter().enumerate() {
            let row_number = self.options.first_row + offset;
            let row = row?;
            summary.rows += 1;
            parent = self.import_row(row_number, &row, parent, &mut summary, &mut on_progress)?;
        }

        tx.commit().map_err(agenda_index::Error::from)?;

        info!(
            rows = summary.rows,
            sessions = summary.sessions,
            subsessions = summary.subsessions,
            speakers = summary.speakers,
            skipped = summary.skipped,
            "agenda import finished"
        );
        on_progress(ImportProgress::Completed(summary.clone()));

        Ok(summary)
    }

    fn import_row<F>(
        &self,
        row_number: usize,
        row: &AgendaRow,
        parent: ParentState,
        summary: &mut ImportSummary,
        on_progress: &mut F,
    ) -> Result<ParentState>
    where
        F: FnMut(ImportProgress),
    {
        let fields = SessionFields::from_row(row);

        match row.kind(&self.options.session_marker) {
            RowKind::Session => match self.db.insert_session(&fields) {
                Ok(id) => {
                    let speakers = self.insert_speakers(row_number, row, SpeakerLink::Session(id))?;
                    summary.sessions += 1;
                    summary.speakers += speakers;
                    on_progress(ImportProgress::SessionInserted {
                        row: row_number,
                        id,
                        speakers,
                    });
                    Ok(ParentState::Active(id))
                }
                Err(err) => {
                    self.skip_or_abort(row_number, err, summary, on_progress)?;
                    Ok(ParentState::Failed)
                }
            },
            RowKind::SubSession => {
                let parent_id = match parent {
                    ParentState::Active(id) => id,
                    ParentState::None => return Err(Error::OrphanSubSession { row: row_number }),
                    ParentState::Failed => {
                        warn!(row = row_number, "skipping sub-session of a failed session");
                        summary.skipped += 1;
                        on_progress(ImportProgress::RowSkipped {
                            row: row_number,
                            reason: "parent session was not imported".to_string(),
                        });
                        return Ok(parent);
                    }
                };

                match self.db.insert_subsession(parent_id, &fields) {
                    Ok(id) => {
                        let speakers =
                            self.insert_speakers(row_number, row, SpeakerLink::SubSession(id))?;
                        summary.subsessions += 1;
                        summary.speakers += speakers;
                        on_progress(ImportProgress::SubSessionInserted {
                            row: row_number,
                            id,
                            parent_id,
                            speakers,
                        });
                    }
                    Err(err) => self.skip_or_abort(row_number, err, summary, on_progress)?,
                }
                Ok(parent)
            }
        }
    }

    /// Returns the number of speaker rows written.
    fn insert_speakers(&self, row_number: usize, row: &AgendaRow, link: SpeakerLink) -> Result<usize> {
        let mut inserted = 0;
        for name in row.speaker_names() {
            match self.db.insert_speaker(name, link) {
                Ok(_) => inserted += 1,
                Err(err) if self.options.policy == InsertFailurePolicy::Skip => {
                    warn!(row = row_number, speaker = name, error = %err, "speaker not imported");
                }
                Err(err) => return Err(err.into()),
            }
        }
        debug!(row = row_number, ?link, inserted, "speakers linked");
        Ok(inserted)
    }

    fn skip_or_abort<F>(
        &self,
        row_number: usize,
        err: agenda_index::Error,
        summary: &mut ImportSummary,
        on_progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(ImportProgress),
    {
        match self.options.policy {
            InsertFailurePolicy::Abort => Err(err.into()),
            InsertFailurePolicy::Skip => {
                warn!(row = row_number, error = %err, "row not imported");
                summary.skipped += 1;
                on_progress(ImportProgress::RowSkipped {
                    row: row_number,
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }
}
