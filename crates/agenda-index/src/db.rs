use rusqlite::{Connection, Transaction};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::queries;
use crate::records::{SessionFields, SessionRecord, SpeakerLink, SpeakerRecord, SubSessionRecord};
use crate::schema::{TableSchema, session_schema, speaker_schema, subsession_schema};
use crate::{Error, Record, Result, Table};

/// File name used when no database path is configured.
pub const DEFAULT_DB_NAME: &str = "agenda.db";

/// Definitions of the three agenda tables.
#[derive(Debug, Clone)]
pub struct AgendaSchemas {
    pub session: TableSchema,
    pub subsession: TableSchema,
    pub speaker: TableSchema,
}

impl AgendaSchemas {
    pub fn new() -> Result<Self> {
        Ok(Self {
            session: session_schema()?,
            subsession: subsession_schema()?,
            speaker: speaker_schema()?,
        })
    }
}

/// Agenda store: one connection with the session, subsession and speaker
/// tables defined on it.
pub struct Database {
    conn: Connection,
    schemas: AgendaSchemas,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        debug!(path = %db_path.display(), "opening agenda database");
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;

        let schemas = AgendaSchemas::new()?;
        Table::define(&conn, &schemas.session)?;
        Table::define(&conn, &schemas.subsession)?;
        Table::define(&conn, &schemas.speaker)?;

        Ok(Self { conn, schemas })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn sessions(&self) -> Table<'_> {
        Table::attach(&self.conn, &self.schemas.session)
    }

    pub fn subsessions(&self) -> Table<'_> {
        Table::attach(&self.conn, &self.schemas.subsession)
    }

    pub fn speakers(&self) -> Table<'_> {
        Table::attach(&self.conn, &self.schemas.speaker)
    }

    /// BEGIN a transaction on the shared connection. Table accessors keep
    /// working through `&self` and their statements join the transaction;
    /// dropping it without `commit` rolls everything back.
    pub fn transaction(&self) -> Result<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Release the connection, reporting any error from the engine.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| Error::Database(err))
    }

    pub fn insert_session(&self, fields: &SessionFields) -> Result<i64> {
        queries::session::insert(&self.sessions(), fields)
    }

    pub fn insert_subsession(&self, session_parent_id: i64, fields: &SessionFields) -> Result<i64> {
        queries::subsession::insert(&self.subsessions(), session_parent_id, fields)
    }

    pub fn insert_speaker(&self, name: &str, link: SpeakerLink) -> Result<i64> {
        queries::speaker::insert(&self.speakers(), name, link)
    }

    pub fn get_session(&self, id: i64) -> Result<Option<SessionRecord>> {
        queries::session::get_by_id(&self.sessions(), id)
    }

    pub fn find_sessions(&self, filters: &Record) -> Result<Vec<SessionRecord>> {
        queries::session::find(&self.sessions(), filters)
    }

    pub fn subsessions_of(&self, session_parent_id: i64) -> Result<Vec<SubSessionRecord>> {
        queries::subsession::children_of(&self.subsessions(), session_parent_id)
    }

    pub fn session_ids_matching(&self, filters: &Record) -> Result<BTreeSet<i64>> {
        queries::ids_matching(&self.sessions(), filters)
    }

    pub fn subsession_ids_matching(&self, filters: &Record) -> Result<BTreeSet<i64>> {
        queries::ids_matching(&self.subsessions(), filters)
    }

    pub fn sessions_by_ids(&self, ids: &BTreeSet<i64>) -> Result<Vec<SessionRecord>> {
        queries::session::by_ids(&self.sessions(), ids)
    }

    pub fn subsessions_by_ids(&self, ids: &BTreeSet<i64>) -> Result<Vec<SubSessionRecord>> {
        queries::subsession::by_ids(&self.subsessions(), ids)
    }

    pub fn speakers_named(&self, name: &str) -> Result<Vec<SpeakerRecord>> {
        queries::speaker::find_by_name(&self.speakers(), name)
    }

    pub fn list_speakers(&self) -> Result<Vec<SpeakerRecord>> {
        queries::speaker::list(&self.speakers())
    }
}
