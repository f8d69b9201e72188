use std::path::PathBuf;

use thiserror::Error;

/// Failures of the output artifact.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("geodata file not found: {0}")]
    Missing(PathBuf),

    #[error("geodata file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize feature collection: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Run-level failures. Per-row failures never surface here; they are logged
/// and the row is skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load locations: {0}")]
    Dataset(#[from] footprint_dataset::DatasetError),

    #[error("failed to build resolver clients: {0}")]
    Resolver(#[from] footprint_resolver::ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
