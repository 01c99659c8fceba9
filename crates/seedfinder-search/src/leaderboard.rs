//! Bounded top-N collection of scored results.

use std::cmp::Ordering;

use crate::candidate::SearchResult;

/// Maximum number of results kept.
pub const LEADERBOARD_CAPACITY: usize = 20;

/// Maximum number of results admitted from a single batch.
pub const ADMITTED_PER_BATCH: usize = 3;

fn by_score_descending(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Results sorted descending by score, at most [`LEADERBOARD_CAPACITY`] long.
#[derive(Clone, Debug, Default)]
pub struct Leaderboard {
    entries: Vec<SearchResult>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit the best results of a batch.
    ///
    /// Results scored under an epoch other than `live_epoch` are dropped. Of
    /// the rest, the [`ADMITTED_PER_BATCH`] highest are inserted and the
    /// board is truncated back to capacity. Returns how many were admitted.
    pub fn merge_batch(&mut self, mut batch: Vec<SearchResult>, live_epoch: u64) -> usize {
        batch.retain(|r| r.epoch() == live_epoch);
        batch.sort_by(by_score_descending);
        batch.truncate(ADMITTED_PER_BATCH);

        let admitted = batch.len();
        if admitted > 0 {
            self.entries.extend(batch);
            self.entries.sort_by(by_score_descending);
            self.entries.truncate(LEADERBOARD_CAPACITY);
        }
        admitted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[SearchResult] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.entries.iter()
    }

    /// Highest-scoring result, if any.
    pub fn best(&self) -> Option<&SearchResult> {
        self.entries.first()
    }
}
