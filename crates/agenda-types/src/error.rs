use std::fmt;

/// Result type for agenda-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while building lookup criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Column list and value list have different lengths
    CriteriaMismatch { columns: usize, values: usize },

    /// Column name is not one of the lookup columns
    UnknownColumn(String),

    /// The same column was given more than once
    DuplicateColumn(String),

    /// No criteria were given at all
    EmptyCriteria,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CriteriaMismatch { columns, values } => write!(
                f,
                "Got {} column(s) but {} value(s); each column needs exactly one value",
                columns, values
            ),
            Error::UnknownColumn(name) => write!(
                f,
                "Invalid column '{}'. Please choose from: {}",
                name,
                crate::LookupColumn::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Error::DuplicateColumn(name) => write!(f, "Column '{}' given more than once", name),
            Error::EmptyCriteria => write!(f, "At least one column/value pair is required"),
        }
    }
}

impl std::error::Error for Error {}
