//! Background loop that drains the queue in CPU-budget batches, scores them
//! on the worker pool and merges the survivors into the leaderboard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::engine::{DrainedBatch, SearchEngine};
use crate::error::CoordinatorError;
use crate::pool::ScoringPool;

/// Sleep between polls when there is nothing to score.
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Lifecycle of a [`SearchCoordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Running,
    Stopped,
}

impl CoordinatorState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Stopped => 2,
        }
    }
}

/// What one coordinator iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The queue was empty or the CPU budget allows no work.
    Empty,
    /// The profile has nothing enabled; the batch was dropped unscored.
    Paused { discarded: usize },
    /// The batch was queued under an older configuration.
    Stale { discarded: usize },
    /// Cancellation was raised while scoring; nothing was merged.
    Cancelled { discarded: usize },
    Merged { scored: usize, admitted: usize },
}

/// Run one coordinator iteration against `engine`.
pub fn run_batch(
    engine: &SearchEngine,
    pool: &ScoringPool,
    processors: usize,
    cancelled: &Arc<AtomicBool>,
) -> Result<BatchOutcome, CoordinatorError> {
    let batch = engine.drain_batch(engine.batch_limit(processors));
    score_drained(engine, pool, batch, cancelled)
}

/// Score and merge a batch already taken off the queue.
fn score_drained(
    engine: &SearchEngine,
    pool: &ScoringPool,
    batch: DrainedBatch,
    cancelled: &Arc<AtomicBool>,
) -> Result<BatchOutcome, CoordinatorError> {
    let size = batch.candidates.len();
    if size == 0 {
        return Ok(BatchOutcome::Empty);
    }

    let Some(snapshot) = engine.snapshot() else {
        tracing::trace!(discarded = size, "Profile is empty, search paused");
        return Ok(BatchOutcome::Paused { discarded: size });
    };

    if batch.epoch != snapshot.params.epoch {
        tracing::trace!(
            batch_epoch = batch.epoch,
            live_epoch = snapshot.params.epoch,
            "Dropping batch queued under an older configuration"
        );
        return Ok(BatchOutcome::Stale { discarded: size });
    }

    let results = pool.score_batch(batch.candidates, snapshot.params, snapshot.profile, cancelled)?;

    if cancelled.load(Ordering::Relaxed) {
        return Ok(BatchOutcome::Cancelled { discarded: size });
    }

    let admitted = engine.merge_batch(results, snapshot.params.epoch, size);
    tracing::debug!(scored = size, admitted, epoch = snapshot.params.epoch, "Batch merged");
    Ok(BatchOutcome::Merged {
        scored: size,
        admitted,
    })
}

/// Owning handle to the background search loop.
///
/// Created idle; [`start`](Self::start) spawns the loop, [`stop`](Self::stop)
/// raises the cancellation flag and [`join`](Self::join) waits for it.
pub struct SearchCoordinator {
    engine: Arc<SearchEngine>,
    processors: usize,
    state: Arc<AtomicU8>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), CoordinatorError>>>,
}

impl SearchCoordinator {
    /// Coordinator sized to the machine's logical CPU count.
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self::with_processor_count(engine, num_cpus::get())
    }

    pub fn with_processor_count(engine: Arc<SearchEngine>, processors: usize) -> Self {
        Self {
            engine,
            processors: processors.max(1),
            state: Arc::new(AtomicU8::new(CoordinatorState::Idle.as_u8())),
            cancelled: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        CoordinatorState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn processors(&self) -> usize {
        self.processors
    }

    pub fn engine(&self) -> &Arc<SearchEngine> {
        &self.engine
    }

    /// Spawn the scoring pool and the coordinator thread.
    pub fn start(&mut self) -> Result<(), CoordinatorError> {
        if self.state() != CoordinatorState::Idle {
            return Err(CoordinatorError::AlreadyStarted);
        }

        let pool = ScoringPool::new(self.processors).map_err(CoordinatorError::Spawn)?;
        let engine = Arc::clone(&self.engine);
        let state = Arc::clone(&self.state);
        let cancelled = Arc::clone(&self.cancelled);
        let processors = self.processors;

        state.store(CoordinatorState::Running.as_u8(), Ordering::Release);
        let spawned = std::thread::Builder::new()
            .name("search-coordinator".into())
            .spawn(move || {
                tracing::info!(processors, "Search coordinator started");
                let outcome = coordinate(&engine, &pool, processors, &cancelled);
                state.store(CoordinatorState::Stopped.as_u8(), Ordering::Release);
                match &outcome {
                    Ok(()) => tracing::info!("Search coordinator stopped"),
                    Err(e) => tracing::error!("Search coordinator failed: {e}"),
                }
                outcome
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.state
                    .store(CoordinatorState::Stopped.as_u8(), Ordering::Release);
                Err(CoordinatorError::Spawn(e))
            }
        }
    }

    /// Ask the loop to exit. A batch being scored is discarded.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        // Never started: nothing will flip the state for us.
        let _ = self.state.compare_exchange(
            CoordinatorState::Idle.as_u8(),
            CoordinatorState::Stopped.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Wait for the loop to exit and report how it ended.
    pub fn join(&mut self) -> Result<(), CoordinatorError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| CoordinatorError::ThreadPanic)?,
            None => Ok(()),
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.stop();
        let _ = self.join();
    }
}

fn coordinate(
    engine: &SearchEngine,
    pool: &ScoringPool,
    processors: usize,
    cancelled: &Arc<AtomicBool>,
) -> Result<(), CoordinatorError> {
    while !cancelled.load(Ordering::Relaxed) {
        match run_batch(engine, pool, processors, cancelled)? {
            BatchOutcome::Empty
            | BatchOutcome::Paused { .. }
            | BatchOutcome::Stale { .. } => std::thread::sleep(IDLE_SLEEP),
            BatchOutcome::Cancelled { .. } | BatchOutcome::Merged { .. } => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use seedfinder_terrain::Biome;

    fn engine_with_meadows() -> Arc<SearchEngine> {
        let mut options = Options {
            resolution: 24,
            cpu_usage: 1.0,
            ..Options::default()
        };
        options.profile.set_target(Biome::Meadows, 0.7).unwrap();
        Arc::new(SearchEngine::new(options).unwrap())
    }

    fn flag(value: bool) -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(value))
    }

    #[test]
    fn test_empty_queue_yields_empty_outcome() {
        let engine = engine_with_meadows();
        let pool = ScoringPool::new(1).unwrap();
        assert_eq!(run_batch(&engine, &pool, 4, &flag(false)).unwrap(), BatchOutcome::Empty);
    }

    #[test]
    fn test_batch_size_follows_cpu_budget() {
        let engine = engine_with_meadows();
        engine.update_options(|o| o.cpu_usage = 0.5).unwrap();
        engine.top_up_queue(10);
        let pool = ScoringPool::new(2).unwrap();

        let outcome = run_batch(&engine, &pool, 4, &flag(false)).unwrap();
        assert!(
            matches!(outcome, BatchOutcome::Merged { scored: 2, .. }),
            "Expected a batch of two, got {outcome:?}"
        );
        assert_eq!(engine.queue_len(), 8);
        assert_eq!(engine.total_generated(), 2);
    }

    #[test]
    fn test_empty_profile_discards_batch() {
        let engine = Arc::new(
            SearchEngine::new(Options {
                cpu_usage: 1.0,
                ..Options::default()
            })
            .unwrap(),
        );
        engine.top_up_queue(5);
        let pool = ScoringPool::new(1).unwrap();

        let outcome = run_batch(&engine, &pool, 3, &flag(false)).unwrap();
        assert_eq!(outcome, BatchOutcome::Paused { discarded: 3 });
        assert!(engine.leaderboard().is_empty());
        assert_eq!(engine.total_generated(), 0);
    }

    #[test]
    fn test_cancelled_batch_is_not_merged() {
        let engine = engine_with_meadows();
        engine.top_up_queue(4);
        let pool = ScoringPool::new(2).unwrap();

        let outcome = run_batch(&engine, &pool, 4, &flag(true)).unwrap();
        assert_eq!(outcome, BatchOutcome::Cancelled { discarded: 4 });
        assert!(engine.leaderboard().is_empty());
    }

    #[test]
    fn test_batch_from_older_epoch_is_dropped() {
        let engine = engine_with_meadows();
        engine.top_up_queue(4);
        let pool = ScoringPool::new(2).unwrap();

        let batch = engine.drain_batch(4);
        assert_eq!(batch.epoch, 0);
        engine.update_options(|o| o.size = 2000).unwrap();

        let outcome = score_drained(&engine, &pool, batch, &flag(false)).unwrap();
        assert_eq!(outcome, BatchOutcome::Stale { discarded: 4 });
        assert!(engine.leaderboard().is_empty());
        assert_eq!(engine.total_generated(), 0);
    }

    #[test]
    fn test_concurrent_edits_leave_only_live_results() {
        let engine = engine_with_meadows();
        let pool = ScoringPool::new(2).unwrap();
        let done = flag(false);

        let editor = {
            let engine = Arc::clone(&engine);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                let mut edits = 0u32;
                while !done.load(Ordering::Relaxed) {
                    let size = if edits % 2 == 0 { 1200 } else { 1000 };
                    engine.update_options(|o| o.size = size).unwrap();
                    edits += 1;
                    std::thread::sleep(Duration::from_millis(1));
                }
                edits
            })
        };

        for _ in 0..30 {
            engine.top_up_queue(8);
            let outcome = run_batch(&engine, &pool, 4, &flag(false)).unwrap();
            assert!(!matches!(outcome, BatchOutcome::Cancelled { .. }));
            let board = engine.leaderboard();
            let live = engine.epoch();
            for result in board {
                assert!(
                    result.params.epoch <= live,
                    "{} carries future epoch {}",
                    result.seed,
                    result.params.epoch
                );
            }
        }

        done.store(true, Ordering::Relaxed);
        let edits = editor.join().unwrap();
        assert!(edits > 0);

        let live = engine.epoch();
        for result in engine.leaderboard() {
            assert_eq!(result.params.epoch, live, "{} survived an edit", result.seed);
        }
    }

    #[test]
    fn test_start_twice_fails() {
        let mut coordinator = SearchCoordinator::with_processor_count(engine_with_meadows(), 1);
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        coordinator.start().unwrap();
        assert!(matches!(coordinator.start(), Err(CoordinatorError::AlreadyStarted)));

        coordinator.stop();
        coordinator.join().unwrap();
        assert_eq!(coordinator.state(), CoordinatorState::Stopped);
    }

    #[test]
    fn test_stop_before_start() {
        let mut coordinator = SearchCoordinator::with_processor_count(engine_with_meadows(), 1);
        coordinator.stop();
        assert_eq!(coordinator.state(), CoordinatorState::Stopped);
        assert!(matches!(coordinator.start(), Err(CoordinatorError::AlreadyStarted)));
        assert!(coordinator.join().is_ok());
    }
}
