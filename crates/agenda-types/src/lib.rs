pub mod criteria;
pub mod error;
pub mod row;

pub use criteria::{Criteria, LookupColumn};
pub use error::{Error, Result};
pub use row::{AgendaRow, DEFAULT_SESSION_MARKER, RowKind, speaker_names};
