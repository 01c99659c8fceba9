//! Fixed-size worker pool that scores candidates in parallel.
//!
//! Each task carries everything it needs (the candidate with its world
//! model, the parameter snapshot and a shared profile), so workers never
//! touch engine state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::candidate::{Candidate, ScoringParams, SearchResult};
use crate::error::CoordinatorError;
use crate::profile::Profile;
use crate::score::evaluate;

struct ScoringTask {
    /// Position in the submitted batch.
    index: usize,
    candidate: Candidate,
    params: ScoringParams,
    profile: Arc<Profile>,
    cancelled: Arc<AtomicBool>,
    /// `None` when the task was skipped because of cancellation.
    reply: Sender<(usize, Option<SearchResult>)>,
}

/// Scoring workers fed through a shared task channel.
pub struct ScoringPool {
    task_sender: Option<Sender<ScoringTask>>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl ScoringPool {
    /// Spawn `worker_count` workers (at least one).
    pub fn new(worker_count: usize) -> std::io::Result<Self> {
        let worker_count = worker_count.max(1);
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<ScoringTask>();

        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let rx: Receiver<ScoringTask> = task_rx.clone();
            let handle = std::thread::Builder::new()
                .name("scoring-worker".into())
                .spawn(move || {
                    while let Ok(task) = rx.recv() {
                        // Skip work for a batch that is going to be discarded.
                        let result = if task.cancelled.load(Ordering::Relaxed) {
                            None
                        } else {
                            Some(evaluate(task.candidate, task.params, &task.profile))
                        };
                        let _ = task.reply.send((task.index, result));
                    }
                })?;
            handles.push(handle);
        }

        Ok(Self {
            task_sender: Some(task_tx),
            worker_handles: handles,
        })
    }

    /// One worker per logical CPU.
    pub fn with_defaults() -> std::io::Result<Self> {
        Self::new(num_cpus::get())
    }

    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    /// Score every candidate and wait for the whole batch.
    ///
    /// Results come back in submission order. Candidates skipped because
    /// `cancelled` was raised are left out.
    pub fn score_batch(
        &self,
        candidates: Vec<Candidate>,
        params: ScoringParams,
        profile: Arc<Profile>,
        cancelled: &Arc<AtomicBool>,
    ) -> Result<Vec<SearchResult>, CoordinatorError> {
        let sender = self.task_sender.as_ref().ok_or(CoordinatorError::PoolClosed)?;
        let count = candidates.len();
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(count);

        for (index, candidate) in candidates.into_iter().enumerate() {
            let task = ScoringTask {
                index,
                candidate,
                params,
                profile: Arc::clone(&profile),
                cancelled: Arc::clone(cancelled),
                reply: reply_tx.clone(),
            };
            sender.send(task).map_err(|_| CoordinatorError::PoolClosed)?;
        }
        drop(reply_tx);

        let mut slots: Vec<Option<SearchResult>> = (0..count).map(|_| None).collect();
        for _ in 0..count {
            // Every worker gone before replying means the pool died.
            let (index, result) = reply_rx.recv().map_err(|_| CoordinatorError::PoolClosed)?;
            slots[index] = result;
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Shut down all workers.
    ///
    /// Drops the task sender so that workers drain and exit, then joins them.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for ScoringPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
