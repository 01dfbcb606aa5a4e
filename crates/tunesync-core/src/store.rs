//! Persistent fingerprint store
//!
//! Maps each source-relative path to the destination path it produced and
//! the content fingerprint it had when that destination was written. The
//! store drives every skip/reprocess decision.
//!
//! The mapping lives in a single JSON file at a fixed name inside the
//! destination root. It is loaded exactly once when the store is opened
//! and written exactly once by [`FingerprintStore::close`]; because
//! `close` consumes the store, mutation after close cannot compile.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tunesync_fs::RelPath;

/// Fixed store file name inside the destination root.
pub const STORE_FILE_NAME: &str = "tunesync.db";

/// What a source path produced on its last successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// Destination path relative to the destination root, sanitized
    pub dest: String,
    /// Source fingerprint at the time the destination was written
    pub fingerprint: String,
}

/// Persistent source-path → (destination, fingerprint) mapping.
///
/// Owned and mutated exclusively by the orchestrator thread; workers see
/// an immutable [`snapshot`](Self::snapshot).
#[derive(Debug)]
pub struct FingerprintStore {
    path: PathBuf,
    records: BTreeMap<String, StoreRecord>,
}

impl FingerprintStore {
    /// Open the store backing file inside `dest_root`.
    ///
    /// A missing or unreadable file is not fatal: the store starts empty
    /// and every source file is treated as new.
    pub fn open(dest_root: &Path) -> Self {
        let path = dest_root.join(STORE_FILE_NAME);
        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(records) => {
                    info!(path = %path.display(), "Loaded fingerprint store");
                    records
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        "Fingerprint store is unreadable, starting empty: {}", e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "No fingerprint store yet, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, records }
    }

    pub fn get(&self, source: &RelPath) -> Option<&StoreRecord> {
        self.records.get(source.as_str())
    }

    pub fn put(&mut self, source: RelPath, dest: RelPath, fingerprint: String) {
        self.records.insert(
            source.as_str().to_string(),
            StoreRecord {
                dest: dest.as_str().to_string(),
                fingerprint,
            },
        );
    }

    pub fn delete(&mut self, source: &RelPath) -> bool {
        self.records.remove(source.as_str()).is_some()
    }

    /// Iterate over all records as (source, record) pairs.
    pub fn items(&self) -> impl Iterator<Item = (&str, &StoreRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Immutable copy of the records for worker threads and the playlist
    /// rewriter. Cheap relative to the I/O a run performs.
    pub fn snapshot(&self) -> HashMap<String, StoreRecord> {
        self.records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Persist the mapping and consume the store.
    ///
    /// A write failure is logged and otherwise ignored: losing the store
    /// only costs reprocessing on the next run. The write is a plain
    /// single write, not an atomic rename, so an interruption mid-write
    /// can lose the previous snapshot as well — a known limitation.
    pub fn close(self) {
        info!(path = %self.path.display(), records = self.records.len(), "Storing fingerprint store");
        let contents = match serde_json::to_string_pretty(&self.records) {
            Ok(contents) => contents,
            Err(e) => {
                error!(path = %self.path.display(), "Failed to serialize fingerprint store: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, contents) {
            error!(path = %self.path.display(), "Failed to write fingerprint store: {}", e);
        }
    }
}
