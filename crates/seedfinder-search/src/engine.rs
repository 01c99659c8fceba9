//! Shared search state: configuration, leaderboard, and the candidate queue.
//!
//! Two locks guard the engine. The state lock covers the options and the
//! leaderboard; the queue lock covers pending candidates and the seed id.
//! Configuration changes take the state lock and then the queue lock, so an
//! invalidation is observed as a single step. Nothing else holds both.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::candidate::{Candidate, ScoringParams, SearchResult};
use crate::error::OptionsError;
use crate::leaderboard::Leaderboard;
use crate::options::Options;
use crate::profile::Profile;
use crate::queue::CandidateQueue;

#[derive(Debug)]
struct SearchState {
    options: Options,
    leaderboard: Leaderboard,
}

/// Candidates drained from the queue, tagged with the epoch they were
/// generated under.
#[derive(Debug)]
pub(crate) struct DrainedBatch {
    pub candidates: Vec<Candidate>,
    pub epoch: u64,
}

/// Configuration captured once per batch.
#[derive(Clone, Debug)]
pub(crate) struct BatchSnapshot {
    pub params: ScoringParams,
    pub profile: Arc<Profile>,
}

/// The search aggregate shared between the supplier, the coordinator and
/// consumers.
#[derive(Debug)]
pub struct SearchEngine {
    state: Mutex<SearchState>,
    queue: Mutex<CandidateQueue>,
    generated: AtomicU64,
}

impl SearchEngine {
    /// Build an engine from validated options.
    pub fn new(options: Options) -> Result<Self, OptionsError> {
        options.validate()?;

        let mut queue = CandidateQueue::new(options.seed_prefix.clone());
        queue.reset(options.seed_prefix.clone(), options.epoch);

        Ok(Self {
            state: Mutex::new(SearchState {
                options,
                leaderboard: Leaderboard::new(),
            }),
            queue: Mutex::new(queue),
            generated: AtomicU64::new(0),
        })
    }

    /// Copy of the live options.
    pub fn options(&self) -> Options {
        lock(&self.state).options.clone()
    }

    pub fn epoch(&self) -> u64 {
        lock(&self.state).options.epoch
    }

    /// Apply a configuration mutation.
    ///
    /// The edited options are validated first; on error nothing changes. If
    /// the edit affects scoring, the queue and leaderboard are cleared, the
    /// seed id and generated counter restart at zero, and the epoch is bumped.
    /// CPU usage edits and no-op edits leave the epoch alone. Returns the
    /// epoch in effect afterwards.
    pub fn update_options<F>(&self, edit: F) -> Result<u64, OptionsError>
    where
        F: FnOnce(&mut Options),
    {
        let mut state = lock(&self.state);

        let mut next = state.options.clone();
        edit(&mut next);
        next.epoch = state.options.epoch;
        next.validate()?;

        if state.options.invalidates(&next) {
            next.epoch += 1;

            let mut queue = lock(&self.queue);
            queue.reset(next.seed_prefix.clone(), next.epoch);
            state.leaderboard.clear();
            self.generated.store(0, Ordering::Relaxed);

            tracing::debug!(epoch = next.epoch, "Search options changed, results invalidated");
        }

        state.options = next;
        Ok(state.options.epoch)
    }

    /// Replace every option except the epoch.
    pub fn set_options(&self, options: Options) -> Result<u64, OptionsError> {
        self.update_options(|live| *live = options)
    }

    /// Normalize the target profile's enabled weights.
    pub fn normalize_profile(&self) -> Result<u64, OptionsError> {
        self.update_options(|o| o.profile.normalize())
    }

    /// Supplier hook: enqueue up to `limit` new `prefix + id` candidates.
    pub fn top_up_queue(&self, limit: usize) -> usize {
        lock(&self.queue).top_up(limit)
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Batch size allowed on `processors` CPUs under the live CPU budget.
    pub fn batch_limit(&self, processors: usize) -> usize {
        lock(&self.state).options.batch_limit(processors)
    }

    pub(crate) fn drain_batch(&self, max: usize) -> DrainedBatch {
        let mut queue = lock(&self.queue);
        DrainedBatch {
            candidates: queue.drain(max),
            epoch: queue.epoch(),
        }
    }

    /// Snapshot the scoring configuration. `None` while the profile has
    /// nothing to search for.
    pub(crate) fn snapshot(&self) -> Option<BatchSnapshot> {
        let state = lock(&self.state);
        let options = &state.options;
        options.profile.is_searchable().then(|| BatchSnapshot {
            params: ScoringParams {
                resolution: options.resolution,
                size: options.size,
                center_biome: options.center_biome,
                epoch: options.epoch,
            },
            profile: Arc::new(options.profile.clone()),
        })
    }

    /// Merge a scored batch into the leaderboard.
    ///
    /// `batch_size` is added to the generated counter only if `batch_epoch`
    /// is still live. Returns how many results were admitted.
    pub(crate) fn merge_batch(
        &self,
        results: Vec<SearchResult>,
        batch_epoch: u64,
        batch_size: usize,
    ) -> usize {
        let mut state = lock(&self.state);
        let live_epoch = state.options.epoch;
        if batch_epoch != live_epoch {
            tracing::trace!(batch_epoch, live_epoch, "Dropping stale batch");
            return 0;
        }

        let admitted = state.leaderboard.merge_batch(results, live_epoch);
        self.generated.fetch_add(batch_size as u64, Ordering::Relaxed);
        admitted
    }

    /// Snapshot of the leaderboard, best first.
    pub fn leaderboard(&self) -> Vec<SearchResult> {
        lock(&self.state).leaderboard.as_slice().to_vec()
    }

    /// Highest-scoring result so far.
    pub fn best(&self) -> Option<SearchResult> {
        lock(&self.state).leaderboard.best().cloned()
    }

    /// Candidates scored since the last invalidation.
    pub fn total_generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }
}

/// Every critical section leaves its data consistent, so a poisoned lock is
/// still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
