//! Error types for table loading, joining and column access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, joining or querying tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Source file could not be opened or written.
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV content was malformed (bad quoting, ragged row, invalid UTF-8).
    #[error("malformed CSV in table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// A column the caller asked for does not exist.
    #[error("table '{table}': missing column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Join suffixing produced a header that already exists.
    #[error("table '{table}': duplicate column '{column}' after join")]
    DuplicateColumn { table: String, column: String },
}

pub type Result<T> = std::result::Result<T, TableError>;
