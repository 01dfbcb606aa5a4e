//! Run orchestration
//!
//! Composes enumeration, reconciliation, scheduling, store commit and
//! playlist rewriting into one synchronization run. All configuration
//! travels in an explicit [`SyncConfig`] value; there is no global state.

use std::path::PathBuf;

use tracing::info;
use tunesync_actions::TagHacks;
use tunesync_fs::enumerate_files;

use crate::error::{Result, SyncError};
use crate::playlist::PlaylistRewriter;
use crate::reconcile::{AutoConfirm, ConfirmPrompt, Reconciler};
use crate::scheduler::{TaskContext, TaskScheduler};
use crate::selector::{ActionSelector, SyncMode};
use crate::store::FingerprintStore;
use crate::task::Task;

/// Everything one synchronization run needs to know.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the source music library
    pub audio_src: PathBuf,
    /// Root of the destination tree
    pub audio_dest: PathBuf,
    /// Root of the source playlists, if playlists should be rewritten
    pub playlist_src: Option<PathBuf>,
    /// Worker count; 1 runs everything on the calling thread
    pub jobs: usize,
    /// Reprocess files even when fingerprints match
    pub force: bool,
    /// Skip interactive confirmations
    pub batch: bool,
    pub mode: SyncMode,
    pub hacks: TagHacks,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Files enumerated under the source root
    pub files: usize,
    /// Files whose pipeline ran and succeeded this run
    pub processed: usize,
}

/// Composes the sync components into one run.
pub struct SyncOrchestrator {
    config: SyncConfig,
}

impl SyncOrchestrator {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Execute one synchronization run.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoInputFiles`] before touching the destination
    /// when the source tree is empty, and [`SyncError::BatchAborted`] when
    /// a worker hit a fatal failure (results collected before the abort
    /// are committed regardless).
    pub fn run(&self, prompt: &dyn ConfirmPrompt) -> Result<SyncReport> {
        let files = enumerate_files(&self.config.audio_src)?;
        if files.is_empty() {
            return Err(SyncError::NoInputFiles {
                root: self.config.audio_src.clone(),
            });
        }
        info!(files = files.len(), "Enumerated source library");

        let mut store = FingerprintStore::open(&self.config.audio_dest);

        // Batch mode never blocks on a question.
        let auto = AutoConfirm;
        let prompt: &dyn ConfirmPrompt = if self.config.batch { &auto } else { prompt };
        Reconciler::new(&self.config.audio_src, &self.config.audio_dest)
            .reconcile(&mut store, prompt);

        let selector = ActionSelector::new(self.config.mode, self.config.hacks);
        let total = files.len();
        let tasks: Vec<Task> = files
            .into_iter()
            .enumerate()
            .map(|(i, source)| Task {
                index: i + 1,
                total,
                actions: selector.select(&source),
                source,
            })
            .collect();

        let snapshot = store.snapshot();
        let outcome = TaskScheduler::new(self.config.jobs).run(
            tasks,
            TaskContext {
                source_root: &self.config.audio_src,
                dest_root: &self.config.audio_dest,
                force: self.config.force,
                records: &snapshot,
            },
        );

        // Only the orchestrator thread touches the store; results commute,
        // so arrival order does not matter.
        let processed = outcome.results.len();
        for result in outcome.results {
            store.put(result.source, result.dest, result.fingerprint);
        }
        let committed = store.snapshot();
        store.close();

        if let Some(fatal) = outcome.fatal {
            return Err(SyncError::BatchAborted {
                message: fatal.to_string(),
            });
        }

        if let Some(playlist_src) = &self.config.playlist_src {
            PlaylistRewriter::new(playlist_src, &self.config.audio_dest, &committed)
                .rewrite_all();
        }

        Ok(SyncReport {
            files: total,
            processed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::AutoConfirm;
    use crate::store::STORE_FILE_NAME;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tunesync_test_utils::TestLibrary;

    fn config(library: &TestLibrary, mode: SyncMode) -> SyncConfig {
        SyncConfig {
            audio_src: library.source_root().to_path_buf(),
            audio_dest: library.dest_root().to_path_buf(),
            playlist_src: None,
            jobs: 1,
            force: false,
            batch: true,
            mode,
            hacks: TagHacks::default(),
        }
    }

    #[test]
    fn empty_source_aborts_without_touching_anything() {
        let library = TestLibrary::new();

        let err = SyncOrchestrator::new(config(&library, SyncMode::Copy))
            .run(&AutoConfirm)
            .unwrap_err();

        assert!(matches!(err, SyncError::NoInputFiles { .. }));
        assert!(!library.dest_root().join(STORE_FILE_NAME).exists());
        assert_eq!(fs::read_dir(library.dest_root()).unwrap().count(), 0);
    }

    #[test]
    fn copy_mode_mirrors_media_files() {
        let library = TestLibrary::new();
        library.add_source("Artist/Song.mp3", b"audio");
        library.add_source("Artist/folder.jpg", b"image");
        library.add_source("Artist/notes.txt", b"not media");

        let report = SyncOrchestrator::new(config(&library, SyncMode::Copy))
            .run(&AutoConfirm)
            .unwrap();

        assert_eq!(report.files, 3);
        assert_eq!(report.processed, 2);
        assert!(library.dest_root().join("Artist/Song.mp3").exists());
        assert!(library.dest_root().join("Artist/folder.jpg").exists());
        assert!(!library.dest_root().join("Artist/notes.txt").exists());
        assert!(library.dest_root().join(STORE_FILE_NAME).exists());
    }

    #[test]
    fn second_run_processes_nothing() {
        let library = TestLibrary::new();
        library.add_source("Artist/Song.mp3", b"audio");

        let orchestrator = SyncOrchestrator::new(config(&library, SyncMode::Copy));
        orchestrator.run(&AutoConfirm).unwrap();
        let report = orchestrator.run(&AutoConfirm).unwrap();

        assert_eq!(report.processed, 0);
    }

    #[test]
    fn removed_source_is_reconciled_on_next_run() {
        let library = TestLibrary::new();
        library.add_source("Artist/Keep.mp3", b"keep");
        library.add_source("Artist/Drop.mp3", b"drop");

        let orchestrator = SyncOrchestrator::new(config(&library, SyncMode::Copy));
        orchestrator.run(&AutoConfirm).unwrap();

        fs::remove_file(library.source_root().join("Artist/Drop.mp3")).unwrap();
        orchestrator.run(&AutoConfirm).unwrap();

        assert!(library.dest_root().join("Artist/Keep.mp3").exists());
        assert!(!library.dest_root().join("Artist/Drop.mp3").exists());
    }
}
