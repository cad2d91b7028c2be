pub mod config;
pub mod error;
pub mod import;
pub mod lookup;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};
pub use import::{ImportOptions, ImportProgress, ImportService, ImportSummary, InsertFailurePolicy};
pub use lookup::{LookupHit, LookupMode, LookupResult, LookupService};
pub use source::CsvRowSource;
