//! Tailer error types.

use std::path::PathBuf;

/// Errors that stop the tailer.
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    #[error("can't open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
