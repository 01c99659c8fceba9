//! Seed candidates before and after scoring.

use std::sync::Arc;

use glam::Vec2;
use seedfinder_terrain::{Biome, BiomeArea, WorldModel};

use crate::profile::Profile;

/// Configuration values a candidate was scored with.
///
/// Stamped at dequeue time so that a result can be matched against the live
/// configuration epoch when it is merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringParams {
    /// Cells per side of the sampled grid.
    pub resolution: usize,
    /// Sampling window size in world units.
    pub size: u32,
    pub center_biome: Biome,
    /// Configuration epoch at stamping time.
    pub epoch: u64,
}

/// A seed waiting to be scored.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub seed: String,
    pub world: Arc<WorldModel>,
}

impl Candidate {
    /// Build the candidate and its world model for `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let world = Arc::new(WorldModel::new(&seed));
        Self { seed, world }
    }
}

/// A scored candidate. Immutable once produced.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub seed: String,
    pub world: Arc<WorldModel>,
    pub params: ScoringParams,
    /// Best contour score in `[0, 1]`; 0 when no contour qualified.
    pub score: f32,
    /// Observed composition around the best contour, if any contour scored.
    pub profile: Option<Profile>,
    /// World-space position of the best contour's centroid.
    pub world_position: Vec2,
}

/// Terrain at a result's world position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Site {
    pub biome: Biome,
    pub area: BiomeArea,
    pub forested: bool,
}

impl SearchResult {
    /// Configuration epoch the result was scored under.
    pub fn epoch(&self) -> u64 {
        self.params.epoch
    }

    /// Terrain at the best contour's centroid.
    pub fn site(&self) -> Site {
        let wx = f64::from(self.world_position.x);
        let wy = f64::from(self.world_position.y);
        Site {
            biome: self.world.effective_biome_at(wx, wy),
            area: self.world.biome_area(wx, wy),
            forested: self.world.in_forest(wx, wy),
        }
    }
}
