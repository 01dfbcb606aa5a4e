//! Error types for tunesync-core

use std::path::PathBuf;

/// Result type for tunesync-core operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that abort a synchronization run.
///
/// Failures local to one file never surface here; they are logged and the
/// file is retried on the next run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The source tree contains no files at all. Raised before any
    /// destination mutation so the caller can abort cleanly.
    #[error("no input files under {root}")]
    NoInputFiles { root: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fs(#[from] tunesync_fs::Error),

    /// A worker hit a failure that would poison every remaining task.
    /// Results collected before the abort were still committed.
    #[error("batch aborted: {message}")]
    BatchAborted { message: String },
}
