//! Biome-weight profiles: the target a search optimizes toward, and the
//! observed composition of a scored region.

use serde::{Deserialize, Serialize};

use seedfinder_terrain::{Biome, BiomeSet};

use crate::error::OptionsError;

/// Weight given to entries that do not specify one.
const DEFAULT_WEIGHT: f32 = 0.1;

fn default_weight() -> f32 {
    DEFAULT_WEIGHT
}

/// Per-biome entry of a [`Profile`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub biome: Biome,
    /// Whether the entry takes part in scoring.
    #[serde(default)]
    pub enabled: bool,
    /// A contour only qualifies if it borders this biome.
    #[serde(default)]
    pub must_be_adjacent: bool,
    /// Desired (target) or measured (observed) share of the region, in `[0, 1]`.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl ProfileEntry {
    fn disabled(biome: Biome, weight: f32) -> Self {
        Self {
            biome,
            enabled: false,
            must_be_adjacent: false,
            weight,
        }
    }
}

/// One entry per biome, indexed by [`Biome::index`].
///
/// Weights need not sum to one; see [`normalize`](Self::normalize).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProfileEntry>", into = "Vec<ProfileEntry>")]
pub struct Profile {
    entries: [ProfileEntry; Biome::COUNT],
}

impl Profile {
    /// Default target: every biome disabled with weight 0.1.
    pub fn new() -> Self {
        Self {
            entries: Biome::ALL.map(|b| ProfileEntry::disabled(b, DEFAULT_WEIGHT)),
        }
    }

    /// Observed profile from per-biome cell counts.
    ///
    /// Entries with a non-zero count are enabled and carry their share of the
    /// total. Returns `None` if no cell was counted.
    pub fn from_histogram(counts: &[u32; Biome::COUNT]) -> Option<Self> {
        let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
        if total == 0 {
            return None;
        }

        let entries = Biome::ALL.map(|biome| {
            let count = counts[biome.index()];
            ProfileEntry {
                biome,
                enabled: count > 0,
                must_be_adjacent: false,
                weight: (f64::from(count) / total as f64) as f32,
            }
        });
        Some(Self { entries })
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    pub fn entry(&self, biome: Biome) -> &ProfileEntry {
        &self.entries[biome.index()]
    }

    pub fn weight(&self, biome: Biome) -> f32 {
        self.entry(biome).weight
    }

    /// Enabled entries in biome order.
    pub fn enabled(&self) -> impl Iterator<Item = &ProfileEntry> {
        self.entries.iter().filter(|e| e.enabled)
    }

    pub fn set_enabled(&mut self, biome: Biome, enabled: bool) {
        self.entries[biome.index()].enabled = enabled;
    }

    pub fn set_must_be_adjacent(&mut self, biome: Biome, required: bool) {
        self.entries[biome.index()].must_be_adjacent = required;
    }

    /// Set a weight, rejecting values outside `[0, 1]`.
    pub fn set_weight(&mut self, biome: Biome, weight: f32) -> Result<(), OptionsError> {
        check_weight(biome, weight)?;
        self.entries[biome.index()].weight = weight;
        Ok(())
    }

    /// Enable `biome` with the given target weight.
    pub fn set_target(&mut self, biome: Biome, weight: f32) -> Result<(), OptionsError> {
        self.set_weight(biome, weight)?;
        self.set_enabled(biome, true);
        Ok(())
    }

    /// `false` when no entry is enabled or adjacency-required. Such a
    /// profile pauses the search rather than failing it.
    pub fn is_searchable(&self) -> bool {
        self.entries.iter().any(|e| e.enabled || e.must_be_adjacent)
    }

    /// Biomes a contour must border to qualify.
    pub fn adjacency_requirements(&self) -> BiomeSet {
        self.entries
            .iter()
            .filter(|e| e.must_be_adjacent)
            .map(|e| e.biome)
            .collect()
    }

    /// Scale enabled, positive weights so the enabled weights sum to one.
    ///
    /// No-op when the enabled weights sum to zero.
    pub fn normalize(&mut self) {
        let sum: f32 = self.enabled().map(|e| e.weight).sum();
        if sum <= 0.0 {
            return;
        }
        for entry in self.entries.iter_mut().filter(|e| e.enabled && e.weight > 0.0) {
            entry.weight /= sum;
        }
    }

    /// Reject weights that are NaN or outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), OptionsError> {
        self.entries
            .iter()
            .try_for_each(|e| check_weight(e.biome, e.weight))
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

fn check_weight(biome: Biome, weight: f32) -> Result<(), OptionsError> {
    if (0.0..=1.0).contains(&weight) {
        Ok(())
    } else {
        Err(OptionsError::WeightOutOfRange { biome, weight })
    }
}

impl TryFrom<Vec<ProfileEntry>> for Profile {
    type Error = OptionsError;

    /// Biomes missing from the list keep their defaults.
    fn try_from(list: Vec<ProfileEntry>) -> Result<Self, Self::Error> {
        let mut profile = Profile::new();
        let mut seen = BiomeSet::new();
        for entry in list {
            if !seen.insert(entry.biome) {
                return Err(OptionsError::DuplicateProfileEntry(entry.biome));
            }
            check_weight(entry.biome, entry.weight)?;
            profile.entries[entry.biome.index()] = entry;
        }
        Ok(profile)
    }
}

impl From<Profile> for Vec<ProfileEntry> {
    fn from(profile: Profile) -> Self {
        profile.entries.to_vec()
    }
}
