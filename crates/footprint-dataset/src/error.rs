use std::path::PathBuf;

use thiserror::Error;

/// Input errors raised while loading or filtering a tabular source.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read workbook {}: {reason}", .path.display())]
    Workbook { path: PathBuf, reason: String },

    #[error("invalid row filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("row filter references unknown column {0:?}")]
    UnknownColumn(String),

    #[error("required column {0:?} is missing")]
    MissingColumn(String),
}
