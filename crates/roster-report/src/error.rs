use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing report output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// Failed to write CSV output.
    #[error("Failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
