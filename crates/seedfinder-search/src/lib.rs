//! Seed search engine: contour extraction and scoring, the candidate queue
//! and leaderboard, and the background coordinator that drives them.

mod candidate;
mod contour;
mod coordinator;
mod engine;
mod error;
mod leaderboard;
mod options;
mod pool;
mod profile;
mod queue;
mod rate;
mod score;

pub use candidate::{Candidate, ScoringParams, SearchResult, Site};
pub use contour::{
    Contour, MIN_CONTOUR_CELLS, extract_contours, filter_contours, find_contours, neighbor_biomes,
};
pub use coordinator::{BatchOutcome, CoordinatorState, SearchCoordinator, run_batch};
pub use engine::SearchEngine;
pub use error::{CoordinatorError, OptionsError};
pub use leaderboard::{ADMITTED_PER_BATCH, LEADERBOARD_CAPACITY, Leaderboard};
pub use options::{MAX_SAMPLING_SIZE, Options};
pub use pool::ScoringPool;
pub use profile::{Profile, ProfileEntry};
pub use queue::{CandidateQueue, QUEUE_CAPACITY};
pub use rate::GenerationRate;
pub use score::{
    RegionScore, best_region, centroid_world_position, evaluate, observe_window, sampling_half_size,
    score_profile,
};
