//! Bounded FIFO of unscored candidates.

use std::collections::VecDeque;

use crate::candidate::Candidate;

/// Maximum number of candidates waiting to be scored.
pub const QUEUE_CAPACITY: usize = 1000;

/// Bounded FIFO of candidates plus the id counter used to name new seeds.
///
/// The queue owns the id so that a configuration change can reset the
/// counter in the same step that clears pending work. It also remembers the
/// configuration epoch its contents were generated under.
#[derive(Debug)]
pub struct CandidateQueue {
    items: VecDeque<Candidate>,
    capacity: usize,
    next_id: u64,
    seed_prefix: String,
    epoch: u64,
}

impl CandidateQueue {
    pub fn new(seed_prefix: impl Into<String>) -> Self {
        Self::with_capacity(seed_prefix, QUEUE_CAPACITY)
    }

    pub fn with_capacity(seed_prefix: impl Into<String>, capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
            seed_prefix: seed_prefix.into(),
            epoch: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Id the next generated seed will carry.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn seed_prefix(&self) -> &str {
        &self.seed_prefix
    }

    /// Configuration epoch of the queued candidates.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Enqueue a candidate, handing it back if the queue is full.
    pub fn push(&mut self, candidate: Candidate) -> Result<(), Candidate> {
        if self.is_full() {
            return Err(candidate);
        }
        self.items.push_back(candidate);
        Ok(())
    }

    /// Fill the queue with `prefix + id` candidates, up to `limit` new ones
    /// and never beyond capacity. Returns how many were added.
    pub fn top_up(&mut self, limit: usize) -> usize {
        let room = self.capacity.saturating_sub(self.items.len()).min(limit);
        for _ in 0..room {
            let seed = format!("{}{}", self.seed_prefix, self.next_id);
            self.next_id += 1;
            self.items.push_back(Candidate::new(seed));
        }
        room
    }

    /// Remove up to `max` candidates from the front.
    pub fn drain(&mut self, max: usize) -> Vec<Candidate> {
        let n = max.min(self.items.len());
        self.items.drain(..n).collect()
    }

    /// Drop pending work and restart id generation under a new prefix and
    /// epoch.
    pub fn reset(&mut self, seed_prefix: impl Into<String>, epoch: u64) {
        self.items.clear();
        self.next_id = 0;
        self.seed_prefix = seed_prefix.into();
        self.epoch = epoch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_up_appends_incrementing_ids() {
        let mut queue = CandidateQueue::new("vsf");
        assert_eq!(queue.top_up(3), 3);

        let seeds: Vec<String> = queue.drain(10).into_iter().map(|c| c.seed).collect();
        assert_eq!(seeds, vec!["vsf0", "vsf1", "vsf2"]);
        assert_eq!(queue.next_id(), 3, "Ids keep counting after a drain");
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut queue = CandidateQueue::with_capacity("s", 5);
        assert_eq!(queue.top_up(100), 5);
        assert!(queue.is_full());
        assert_eq!(queue.top_up(100), 0, "A full queue refuses more work");

        let rejected = queue.push(Candidate::new("extra"));
        assert!(rejected.is_err());
        assert_eq!(rejected.unwrap_err().seed, "extra");
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_drain_is_fifo() {
        let mut queue = CandidateQueue::new("x");
        queue.push(Candidate::new("a")).unwrap();
        queue.push(Candidate::new("b")).unwrap();
        queue.push(Candidate::new("c")).unwrap();

        let first: Vec<String> = queue.drain(2).into_iter().map(|c| c.seed).collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);
        assert!(queue.drain(0).is_empty());
    }

    #[test]
    fn test_reset_clears_items_and_counter() {
        let mut queue = CandidateQueue::new("old");
        queue.top_up(4);
        queue.reset("new", 3);

        assert!(queue.is_empty());
        assert_eq!(queue.next_id(), 0);
        assert_eq!(queue.seed_prefix(), "new");
        assert_eq!(queue.epoch(), 3);

        queue.top_up(1);
        assert_eq!(queue.drain(1)[0].seed, "new0");
    }

    #[test]
    fn test_default_capacity() {
        let mut queue = CandidateQueue::new("cap");
        assert_eq!(queue.capacity(), QUEUE_CAPACITY);
        assert_eq!(queue.top_up(usize::MAX), QUEUE_CAPACITY);
    }
}
