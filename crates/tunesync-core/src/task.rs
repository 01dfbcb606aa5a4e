//! Task values exchanged between the orchestrator and workers
//!
//! Both types are immutable once built: a [`Task`] crosses into a worker,
//! a [`TaskResult`] crosses back, and nothing else is shared.

use std::sync::Arc;

use tunesync_actions::Action;
use tunesync_fs::RelPath;

/// One file's unit of work.
#[derive(Clone)]
pub struct Task {
    /// 1-based position in the run, for progress output
    pub index: usize,
    /// Total number of enumerated files
    pub total: usize,
    /// Source path relative to the source root
    pub source: RelPath,
    /// Ordered action pipeline; empty means the file is skipped
    pub actions: Vec<Arc<dyn Action>>,
}

/// Successful outcome of a task, committed into the store by the
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub source: RelPath,
    pub dest: RelPath,
    pub fingerprint: String,
}
