//! Task scheduling and execution
//!
//! Fans the per-file action pipelines out across a bounded pool of worker
//! threads. Workers receive immutable [`Task`] values plus a read-only
//! snapshot of the fingerprint store, and hand immutable results back over
//! a channel; the store itself never crosses the boundary, so no locking
//! is needed around it.
//!
//! `jobs == 1` bypasses the pool entirely and runs every task on the
//! calling thread, which keeps failure diagnosis deterministic.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info, warn};
use tunesync_fs::{RelPath, fingerprint_file};

use crate::store::StoreRecord;
use crate::task::{Task, TaskResult};

/// A failure that poisons the whole batch.
#[derive(Debug, Clone)]
pub struct FatalFailure {
    pub source: RelPath,
    pub message: String,
}

impl std::fmt::Display for FatalFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// What a batch produced.
///
/// `fatal` being set means scheduling stopped early; `results` still
/// contains everything that completed before the abort and must be
/// committed regardless.
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<TaskResult>,
    pub fatal: Option<FatalFailure>,
}

/// Immutable per-run context shared by every worker.
#[derive(Clone, Copy)]
pub struct TaskContext<'a> {
    pub source_root: &'a Path,
    pub dest_root: &'a Path,
    /// Reprocess files even when fingerprints match
    pub force: bool,
    /// Read-only view of the store taken before dispatch
    pub records: &'a HashMap<String, StoreRecord>,
}

enum WorkerMessage {
    Done(TaskResult),
    Fatal(FatalFailure),
}

/// Runs task batches with bounded parallelism.
pub struct TaskScheduler {
    jobs: usize,
}

impl TaskScheduler {
    pub fn new(jobs: usize) -> Self {
        Self {
            jobs: jobs.max(1),
        }
    }

    /// Execute all tasks and collect their results.
    ///
    /// Recoverable per-file failures are logged and dropped (the file is
    /// retried next run). A fatal failure stops dispatching further tasks
    /// but everything already completed is kept.
    pub fn run(&self, tasks: Vec<Task>, ctx: TaskContext<'_>) -> BatchOutcome {
        info!(tasks = tasks.len(), jobs = self.jobs, "Starting actions");
        if self.jobs == 1 {
            Self::run_sequential(tasks, ctx)
        } else {
            self.run_parallel(tasks, ctx)
        }
    }

    fn run_sequential(tasks: Vec<Task>, ctx: TaskContext<'_>) -> BatchOutcome {
        let mut results = Vec::new();
        for task in &tasks {
            match execute_task(task, ctx) {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(fatal) => {
                    return BatchOutcome {
                        results,
                        fatal: Some(fatal),
                    };
                }
            }
        }
        BatchOutcome {
            results,
            fatal: None,
        }
    }

    fn run_parallel(&self, tasks: Vec<Task>, ctx: TaskContext<'_>) -> BatchOutcome {
        let queue = Mutex::new(tasks.into_iter());
        let abort = AtomicBool::new(false);
        let (message_tx, message_rx) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..self.jobs {
                let message_tx = message_tx.clone();
                let queue = &queue;
                let abort = &abort;
                scope.spawn(move || {
                    loop {
                        if abort.load(Ordering::Acquire) {
                            break;
                        }
                        let task = match queue.lock() {
                            Ok(mut queue) => queue.next(),
                            Err(_) => None,
                        };
                        let Some(task) = task else { break };

                        match execute_task(&task, ctx) {
                            Ok(Some(result)) => {
                                let _ = message_tx.send(WorkerMessage::Done(result));
                            }
                            Ok(None) => {}
                            Err(fatal) => {
                                abort.store(true, Ordering::Release);
                                let _ = message_tx.send(WorkerMessage::Fatal(fatal));
                                break;
                            }
                        }
                    }
                });
            }
            drop(message_tx);

            let mut results = Vec::new();
            let mut fatal = None;
            for message in message_rx {
                match message {
                    WorkerMessage::Done(result) => results.push(result),
                    WorkerMessage::Fatal(failure) => {
                        if fatal.is_none() {
                            fatal = Some(failure);
                        }
                    }
                }
            }
            BatchOutcome { results, fatal }
        })
    }
}

/// Run one file's pipeline.
///
/// `Ok(None)` means the file produced nothing this run: not selected,
/// already up to date, or hit a recoverable failure that was logged.
fn execute_task(task: &Task, ctx: TaskContext<'_>) -> Result<Option<TaskResult>, FatalFailure> {
    let Some(first) = task.actions.first() else {
        info!(
            "{:>4}/{:<4} skipping {}",
            task.index, task.total, task.source
        );
        return Ok(None);
    };
    let Some(dest) = first.destination_name(&task.source) else {
        info!(
            "{:>4}/{:<4} skipping {}",
            task.index, task.total, task.source
        );
        return Ok(None);
    };
    let dest = dest.sanitize();
    info!(
        "{:>4}/{:<4} {} {} to {}",
        task.index,
        task.total,
        first.name(),
        task.source,
        dest
    );

    let source_abs = task.source.resolve(ctx.source_root);
    let dest_abs = dest.resolve(ctx.dest_root);

    let fingerprint = match fingerprint_file(&source_abs) {
        Ok(fingerprint) => fingerprint,
        Err(e) => {
            warn!("Failed to fingerprint {}: {}", task.source, e);
            return Ok(None);
        }
    };

    let unchanged = ctx
        .records
        .get(task.source.as_str())
        .is_some_and(|record| record.fingerprint == fingerprint);
    if !ctx.force && unchanged && dest_abs.exists() {
        debug!("Skipping up to date file {}", task.source);
        return Ok(None);
    }

    if let Some(parent) = dest_abs.parent() {
        // Racing against other workers creating the same album directory
        // is fine; create_dir_all is idempotent.
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create {}: {}", parent.display(), e);
            return Ok(None);
        }
    }

    for action in &task.actions {
        if let Err(err) = action.apply(&source_abs, &dest_abs) {
            if err.is_fatal() {
                return Err(FatalFailure {
                    source: task.source.clone(),
                    message: err.to_string(),
                });
            }
            warn!("{}: {} failed: {}", task.source, action.name(), err);
            return Ok(None);
        }
    }

    Ok(Some(TaskResult {
        source: task.source.clone(),
        dest,
        fingerprint,
    }))
}
