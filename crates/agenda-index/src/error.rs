use std::fmt;

/// Result type for agenda-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the index layer
#[derive(Debug)]
pub enum Error {
    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Table name or schema mapping rejected at construction time
    Schema(String),

    /// Column is not declared in the table schema
    UnknownColumn { table: String, column: String },

    /// Query-specific error (invalid input, empty update, etc.)
    Query(String),

    /// A stored row could not be converted into a typed record
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => {
                let msg = err.to_string();
                // Tables are never migrated; point at the only fix
                if msg.contains("no such column") || msg.contains("has no column named") {
                    write!(
                        f,
                        "Database schema mismatch: {}. Delete the database file to recreate the tables.",
                        msg
                    )
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Schema(msg) => write!(f, "Invalid schema: {}", msg),
            Error::UnknownColumn { table, column } => {
                write!(f, "Unknown column '{}' for table '{}'", column, table)
            }
            Error::Query(msg) => write!(f, "Query error: {}", msg),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Schema(_)
            | Error::UnknownColumn { .. }
            | Error::Query(_)
            | Error::Decode(_) => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
