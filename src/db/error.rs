use std::path::PathBuf;

use thiserror::Error;

/// Failures of the backing medium. Corrupt individual records are not
/// errors; retrieval skips them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("failed to prepare storage directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage worker unavailable: {0}")]
    WorkerUnavailable(String),
}
