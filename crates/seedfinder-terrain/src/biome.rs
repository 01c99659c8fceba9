//! Biome enumeration and a small set type used for adjacency requirements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Terrain classification of a single map cell.
///
/// Discriminants are stable and double as array indices; see [`Biome::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    /// Outside the playable radius.
    None = 0,
    Meadows = 1,
    Swamp = 2,
    Mountain = 3,
    BlackForest = 4,
    Plains = 5,
    AshLands = 6,
    DeepNorth = 7,
    Ocean = 8,
    Mistlands = 9,
    /// Low-lying land reclassified by height, never produced by the raw classifier.
    Shallows = 10,
}

impl Biome {
    /// Number of biomes. Upper bound for iteration and per-biome arrays.
    pub const COUNT: usize = 11;

    /// Every biome in discriminant order.
    pub const ALL: [Biome; Biome::COUNT] = [
        Biome::None,
        Biome::Meadows,
        Biome::Swamp,
        Biome::Mountain,
        Biome::BlackForest,
        Biome::Plains,
        Biome::AshLands,
        Biome::DeepNorth,
        Biome::Ocean,
        Biome::Mistlands,
        Biome::Shallows,
    ];

    /// Array index of this biome, in `0..Biome::COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Biome> {
        Self::ALL.get(index).copied()
    }

    /// Display name, matching the variant name.
    pub fn name(self) -> &'static str {
        match self {
            Biome::None => "None",
            Biome::Meadows => "Meadows",
            Biome::Swamp => "Swamp",
            Biome::Mountain => "Mountain",
            Biome::BlackForest => "BlackForest",
            Biome::Plains => "Plains",
            Biome::AshLands => "AshLands",
            Biome::DeepNorth => "DeepNorth",
            Biome::Ocean => "Ocean",
            Biome::Mistlands => "Mistlands",
            Biome::Shallows => "Shallows",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a biome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown biome: {0}")]
pub struct ParseBiomeError(pub String);

impl FromStr for Biome {
    type Err = ParseBiomeError;

    /// Case-insensitive; `-` and `_` are ignored so `black-forest` parses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Biome::ALL
            .iter()
            .copied()
            .find(|b| b.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| ParseBiomeError(s.to_string()))
    }
}

/// Whether a point sits inside a uniform biome patch or on its border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiomeArea {
    Edge,
    Median,
}

/// A set of biomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BiomeSet {
    members: [bool; Biome::COUNT],
}

impl BiomeSet {
    /// The empty set.
    pub const fn new() -> Self {
        Self {
            members: [false; Biome::COUNT],
        }
    }

    /// Adds `biome`; returns `true` if it was not already present.
    pub fn insert(&mut self, biome: Biome) -> bool {
        let slot = &mut self.members[biome.index()];
        let added = !*slot;
        *slot = true;
        added
    }

    pub fn contains(&self, biome: Biome) -> bool {
        self.members[biome.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|&m| m)
    }

    pub fn len(&self) -> usize {
        self.members.iter().filter(|&&m| m).count()
    }

    /// `true` if every member of `other` is also in `self`.
    pub fn is_superset(&self, other: &BiomeSet) -> bool {
        other.iter().all(|b| self.contains(b))
    }

    /// Members in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = Biome> + '_ {
        Biome::ALL.iter().copied().filter(|b| self.contains(*b))
    }
}

impl FromIterator<Biome> for BiomeSet {
    fn from_iter<I: IntoIterator<Item = Biome>>(iter: I) -> Self {
        let mut set = BiomeSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Biome> for BiomeSet {
    fn extend<I: IntoIterator<Item = Biome>>(&mut self, iter: I) {
        for biome in iter {
            self.insert(biome);
        }
    }
}
