//! Copy action

use std::fs;
use std::path::Path;

use tracing::debug;
use tunesync_fs::RelPath;

use crate::{Action, ActionError};

/// Copies the source file to the destination unchanged.
///
/// Used for cover art, for `copy` mode, and for files that are already in
/// the target format.
#[derive(Debug, Default)]
pub struct CopyAction;

impl Action for CopyAction {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn destination_name(&self, source: &RelPath) -> Option<RelPath> {
        Some(source.clone())
    }

    fn apply(&self, source: &Path, dest: &Path) -> Result<(), ActionError> {
        debug!(source = %source.display(), dest = %dest.display(), "Copying");
        fs::copy(source, dest).map_err(|e| {
            ActionError::io(format!(
                "failed to copy {} to {}: {}",
                source.display(),
                dest.display(),
                e
            ))
        })?;
        Ok(())
    }
}
