//! Error types for the tunesync CLI

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the operator.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A user-facing message with no further context
    #[error("{0}")]
    User(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Sync(#[from] tunesync_core::SyncError),

    #[error(transparent)]
    Dialog(#[from] dialoguer::Error),
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}
