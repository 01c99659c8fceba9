//! Live search configuration.

use seedfinder_terrain::{Biome, WORLD_EXTENT};

use crate::error::OptionsError;
use crate::profile::Profile;

/// Largest accepted sampling size: a window this wide covers the whole map.
pub const MAX_SAMPLING_SIZE: u32 = (2.0 * WORLD_EXTENT) as u32;

/// Everything the coordinator and scorer read from configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Seeds are generated as `seed_prefix + id`.
    pub seed_prefix: String,
    /// Cells per side of the sampled grid.
    pub resolution: usize,
    /// Fraction of logical CPUs used per batch, in `[0, 1]`.
    pub cpu_usage: f32,
    /// Sampling window size in world units.
    pub size: u32,
    pub center_biome: Biome,
    pub profile: Profile,
    /// Bumped on every invalidating change.
    pub epoch: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed_prefix: "vsf".to_string(),
            resolution: 120,
            cpu_usage: 0.5,
            size: 1000,
            center_biome: Biome::Meadows,
            profile: Profile::new(),
            epoch: 0,
        }
    }
}

impl Options {
    /// Check the configuration contract.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.resolution == 0 {
            return Err(OptionsError::ZeroResolution);
        }
        if self.size > MAX_SAMPLING_SIZE {
            return Err(OptionsError::SizeTooLarge {
                size: self.size,
                max: MAX_SAMPLING_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&self.cpu_usage) {
            return Err(OptionsError::CpuUsageOutOfRange(self.cpu_usage));
        }
        if self.seed_prefix.contains('\0') {
            return Err(OptionsError::NulInSeedPrefix);
        }
        self.profile.validate()
    }

    /// `true` if moving from `self` to `other` makes queued and ranked work
    /// stale. CPU usage and the epoch itself do not count.
    pub fn invalidates(&self, other: &Options) -> bool {
        self.seed_prefix != other.seed_prefix
            || self.resolution != other.resolution
            || self.size != other.size
            || self.center_biome != other.center_biome
            || self.profile != other.profile
    }

    /// Candidates the coordinator may take per batch on `processors` CPUs.
    pub fn batch_limit(&self, processors: usize) -> usize {
        (processors as f64 * f64::from(self.cpu_usage)).floor() as usize
    }
}
