//! Error types shared by the loader, cleaner and exporters.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("No file provided: please upload a climate CSV")]
    NoFileProvided,

    #[error("Column layout mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("Cannot parse '{raw}' as a number")]
    ParseFailure { raw: String },

    #[error("No records match the current filters")]
    EmptyResultSet,

    #[error("I/O error on '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read or write CSV: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Chart rendering failed: {0}")]
    Render(String),
}

impl DashboardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }

    /// Positional layout mismatch on column count.
    pub(crate) fn column_count(expected: usize, found: usize) -> Self {
        DashboardError::SchemaMismatch {
            expected: format!("{expected} columns"),
            found: format!("{found} columns"),
        }
    }
}
