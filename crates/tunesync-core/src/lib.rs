//! Incremental synchronization engine for tunesync
//!
//! Mirrors a music library into a transformed destination tree: a
//! persistent fingerprint store decides which files need work, a bounded
//! worker pool runs per-file action pipelines, orphaned outputs are
//! reconciled away, and M3U playlists are rewritten against the committed
//! store.

pub mod error;
pub mod orchestrator;
pub mod playlist;
pub mod reconcile;
pub mod scheduler;
pub mod selector;
pub mod store;
pub mod task;

pub use error::{Result, SyncError};
pub use orchestrator::{SyncConfig, SyncOrchestrator, SyncReport};
pub use playlist::PlaylistRewriter;
pub use reconcile::{AutoConfirm, ConfirmPrompt, Reconciler};
pub use scheduler::{BatchOutcome, TaskContext, TaskScheduler};
pub use selector::{ActionSelector, SyncMode};
pub use store::{FingerprintStore, StoreRecord, STORE_FILE_NAME};
pub use task::{Task, TaskResult};
