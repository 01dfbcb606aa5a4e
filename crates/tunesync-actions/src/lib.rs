//! File transformation actions for tunesync
//!
//! An [`Action`] is one step applied to a (source, destination) pair:
//! copying bytes, transcoding audio through an external encoder, or
//! converting tags. The sync engine composes actions into per-file
//! pipelines and never needs to know what an individual action does.

pub mod copy;
pub mod replaygain;
pub mod tags;
pub mod transcode;

use std::path::Path;

use tunesync_fs::RelPath;

pub use copy::CopyAction;
pub use replaygain::ReplayGain;
pub use tags::{TagCopy, TagHacks};
pub use transcode::{GainMode, Transcode};

/// Failure reported by an [`Action`].
///
/// `Io` failures are local to one file: the engine logs them, skips the
/// file and retries it on a future run. `Fatal` failures poison the whole
/// batch (for example a missing encoder binary, which would fail every
/// remaining file identically).
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{message}")]
    Io { message: String },

    #[error("{message}")]
    Fatal { message: String },
}

impl ActionError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

/// One transformation step applied to a source/destination pair.
pub trait Action: Send + Sync {
    /// Diagnostic label used in progress output and logs.
    fn name(&self) -> &'static str;

    /// Destination path for a given source path, relative to the
    /// destination root. `None` means the file is skipped entirely.
    fn destination_name(&self, source: &RelPath) -> Option<RelPath>;

    /// Apply the transformation. `source` and `dest` are absolute paths;
    /// the destination's parent directory already exists.
    fn apply(&self, source: &Path, dest: &Path) -> Result<(), ActionError>;
}
