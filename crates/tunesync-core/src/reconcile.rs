//! Orphan reconciliation
//!
//! Walks the fingerprint store looking for records whose source file no
//! longer exists, removes the destination artifacts they map to, drops the
//! records, and finally prunes destination directories left empty.
//!
//! Runs against the store as loaded at run start, before any scheduling.

use std::fs;
use std::path::Path;

use tracing::{info, warn};
use tunesync_fs::RelPath;
use walkdir::WalkDir;

use crate::store::FingerprintStore;

/// Asks the operator before destructive operations.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Confirms every question without asking. Used in batch mode.
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Deletes destination artifacts and records whose source vanished.
pub struct Reconciler<'a> {
    source_root: &'a Path,
    dest_root: &'a Path,
}

impl<'a> Reconciler<'a> {
    pub fn new(source_root: &'a Path, dest_root: &'a Path) -> Self {
        Self {
            source_root,
            dest_root,
        }
    }

    /// Remove orphaned artifacts and records, then prune empty directories.
    ///
    /// A record is dropped only once its destination artifact is gone
    /// (never existed, or was removed here). A failed artifact deletion
    /// keeps the record so the next run retries it.
    pub fn reconcile(&self, store: &mut FingerprintStore, prompt: &dyn ConfirmPrompt) {
        info!("Cleaning up missing files");

        let entries: Vec<(String, String)> = store
            .items()
            .map(|(source, record)| (source.to_string(), record.dest.clone()))
            .collect();

        for (source, dest) in entries {
            let source_rel = RelPath::new(&source);
            if source_rel.resolve(self.source_root).exists() {
                continue;
            }

            let dest_abs = RelPath::new(&dest).resolve(self.dest_root);
            if dest_abs.exists() {
                let question =
                    format!("File {source} does not exist, do you want to remove {dest}?");
                if !prompt.confirm(&question) {
                    continue;
                }
                if let Err(e) = fs::remove_file(&dest_abs) {
                    warn!("Failed to remove {}: {}", dest_abs.display(), e);
                }
            }

            if !dest_abs.exists() {
                store.delete(&source_rel);
                info!("Removed record for {}", source);
            }
        }

        self.prune_empty_directories();
    }

    /// Remove directories left empty under the destination root, deepest
    /// first. Removal of a non-empty directory fails and is ignored.
    fn prune_empty_directories(&self) {
        let walker = WalkDir::new(self.dest_root)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok());
        for entry in walker {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                continue;
            }
            if fs::remove_dir(entry.path()).is_ok() {
                info!("Pruned empty directory {}", entry.path().display());
            }
        }
    }
}
