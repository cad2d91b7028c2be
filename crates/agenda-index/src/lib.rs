// SQLite agenda store
// Generic single-table accessor plus the three agenda tables built on it

mod db;
mod error;
mod queries;
mod records;
mod schema;
mod table;
mod value;

// Public API
pub use db::{AgendaSchemas, DEFAULT_DB_NAME, Database};
pub use error::{Error, Result};
pub use records::{SessionFields, SessionRecord, SpeakerLink, SpeakerRecord, SubSessionRecord};
pub use schema::{ColumnDef, TableSchema, speaker_schema, session_schema, subsession_schema};
pub use table::{Predicate, Table};
pub use value::{Record, Value};
