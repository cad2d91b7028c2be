use std::fmt;

/// Result type for agenda-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Database/index layer error
    Index(agenda_index::Error),

    /// Lookup criteria were rejected
    Criteria(agenda_types::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Agenda source could not be read
    Csv(csv::Error),

    /// Configuration error
    Config(String),

    /// A sub-session row appeared before any session row
    OrphanSubSession { row: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Index(err) => write!(f, "Index error: {}", err),
            Error::Criteria(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Csv(err) => write!(f, "Agenda source error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::OrphanSubSession { row } => write!(
                f,
                "Sub-session found without a preceding main session (row {})",
                row
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Index(err) => Some(err),
            Error::Criteria(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Config(_) | Error::OrphanSubSession { .. } => None,
        }
    }
}

impl From<agenda_index::Error> for Error {
    fn from(err: agenda_index::Error) -> Self {
        Error::Index(err)
    }
}

impl From<agenda_types::Error> for Error {
    fn from(err: agenda_types::Error) -> Self {
        Error::Criteria(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
