//! Per-seed world model: biome classification and surface height.
//!
//! A [`WorldModel`] derives its offsets and sub-seeds once from the seed hash
//! and is immutable afterwards, so it can be shared freely between threads.

use rand::Rng;

use crate::biome::{Biome, BiomeArea};
use crate::noise_field::{NoiseField, clamp01, lerp, lerp_step, smooth_step};
use crate::seed::{det_atan2, det_sin, det_sqrt, stable_hash, world_rng};
use crate::version::{VersionParams, WorldGenVersion};

/// Radius of the playable disc in world units.
pub const WORLD_RADIUS: f64 = 10_000.0;

/// Radius at which the terrain has fully sunk below the sea.
pub const WATER_EDGE: f64 = 10_500.0;

/// Tiles below this height that are not Ocean count as Shallows.
pub const SHALLOWS_HEIGHT: f64 = 29.0;

/// Fixed height reported for Mountain tiles.
pub const MOUNTAIN_HEIGHT: f64 = 60.0;

/// Shift applied to every terrain coordinate before sampling noise.
const TERRAIN_SHIFT: f64 = 100_000.0;

/// Biome noise frequency.
const BIOME_FREQUENCY: f64 = 0.001;

/// Offset of the neighbor samples used by [`WorldModel::biome_area`].
const AREA_OFFSET: f64 = 64.0;

/// Deterministic world derived from a seed.
#[derive(Clone, Debug)]
pub struct WorldModel {
    seed_hash: i32,
    version: WorldGenVersion,
    params: VersionParams,
    offset0: f64,
    offset1: f64,
    offset2: f64,
    offset3: f64,
    offset4: f64,
    river_seed: i32,
    stream_seed: i32,
    noise: NoiseField,
}

impl WorldModel {
    /// Build the world for `seed` with the latest generator version.
    pub fn new(seed: &str) -> Self {
        Self::from_hash(stable_hash(seed), WorldGenVersion::LATEST)
    }

    /// Build the world for `seed` with a specific generator version.
    pub fn with_version(seed: &str, version: WorldGenVersion) -> Self {
        Self::from_hash(stable_hash(seed), version)
    }

    /// Build the world from an already hashed seed.
    ///
    /// Draw order is fixed: four offsets, two sub-seeds, then the last offset.
    pub fn from_hash(seed_hash: i32, version: WorldGenVersion) -> Self {
        let mut rng = world_rng(seed_hash);
        let mut offset = || f64::from(rng.random_range(-10_000_i32..10_000));
        let offset0 = offset();
        let offset1 = offset();
        let offset2 = offset();
        let offset3 = offset();
        let river_seed = rng.random_range(i32::MIN..i32::MAX);
        let stream_seed = rng.random_range(i32::MIN..i32::MAX);
        let offset4 = f64::from(rng.random_range(-10_000_i32..10_000));

        Self {
            seed_hash,
            version,
            params: version.params(),
            offset0,
            offset1,
            offset2,
            offset3,
            offset4,
            river_seed,
            stream_seed,
            noise: NoiseField::new(),
        }
    }

    pub fn seed_hash(&self) -> i32 {
        self.seed_hash
    }

    pub fn version(&self) -> WorldGenVersion {
        self.version
    }

    /// The five coordinate offsets, in derivation order.
    pub fn offsets(&self) -> [f64; 5] {
        [
            self.offset0,
            self.offset1,
            self.offset2,
            self.offset3,
            self.offset4,
        ]
    }

    pub fn river_seed(&self) -> i32 {
        self.river_seed
    }

    pub fn stream_seed(&self) -> i32 {
        self.stream_seed
    }

    /// Raw biome at world position `(wx, wy)`. Rules are checked in priority
    /// order; the first match wins.
    pub fn biome_at(&self, wx: f64, wy: f64) -> Biome {
        let magnitude = det_sqrt(wx * wx + wy * wy);
        let base_height = self.base_height(wx, wy);
        let warp = det_sin(det_atan2(wx, wy) * 20.0) * 100.0;

        if length(wx, wy - 4000.0) > 12_000.0 + warp {
            return Biome::AshLands;
        }

        if base_height <= 0.02 {
            return Biome::Ocean;
        }

        if length(wx, wy + 4000.0) > 12_000.0 + warp {
            if base_height > 0.4 {
                return Biome::Mountain;
            }
            return Biome::DeepNorth;
        }

        if base_height > 0.4 {
            return Biome::Mountain;
        }

        if self.biome_noise(self.offset0, wx, wy) > 0.6
            && magnitude > 2000.0
            && magnitude < self.params.max_marsh_distance
            && base_height > 0.05
            && base_height < 0.25
        {
            return Biome::Swamp;
        }

        if self.biome_noise(self.offset4, wx, wy) > self.params.min_darkland_noise
            && magnitude > 6000.0 + warp
            && magnitude < 10_000.0
        {
            return Biome::Mistlands;
        }

        if self.biome_noise(self.offset1, wx, wy) > 0.4
            && magnitude > 3000.0 + warp
            && magnitude < 8000.0
        {
            return Biome::Plains;
        }

        if self.biome_noise(self.offset2, wx, wy) > 0.4
            && magnitude > 600.0 + warp
            && magnitude < 6000.0
        {
            return Biome::BlackForest;
        }

        if magnitude > 5000.0 + warp {
            return Biome::BlackForest;
        }

        Biome::Meadows
    }

    /// Surface height of `biome` at `(wx, wy)`.
    pub fn height_at(&self, biome: Biome, wx: f64, wy: f64) -> f64 {
        if biome == Biome::Mountain {
            return MOUNTAIN_HEIGHT;
        }
        self.menu_height(wx, wy) * 200.0
    }

    /// Surface height using the biome classified at the same point.
    pub fn height(&self, wx: f64, wy: f64) -> f64 {
        self.height_at(self.biome_at(wx, wy), wx, wy)
    }

    /// Biome after the Shallows rule: low non-Ocean tiles become Shallows.
    ///
    /// Every scoring path samples through this.
    pub fn effective_biome_at(&self, wx: f64, wy: f64) -> Biome {
        let biome = self.biome_at(wx, wy);
        if biome != Biome::Ocean && self.height_at(biome, wx, wy) < SHALLOWS_HEIGHT {
            Biome::Shallows
        } else {
            biome
        }
    }

    /// [`BiomeArea::Median`] if all eight neighbor samples share the point's biome.
    pub fn biome_area(&self, wx: f64, wy: f64) -> BiomeArea {
        let center = self.biome_at(wx, wy);
        let neighbors = [
            (-AREA_OFFSET, -AREA_OFFSET),
            (AREA_OFFSET, -AREA_OFFSET),
            (AREA_OFFSET, AREA_OFFSET),
            (-AREA_OFFSET, AREA_OFFSET),
            (-AREA_OFFSET, 0.0),
            (AREA_OFFSET, 0.0),
            (0.0, -AREA_OFFSET),
            (0.0, AREA_OFFSET),
        ];
        let uniform = neighbors
            .iter()
            .all(|&(dx, dy)| self.biome_at(wx - dx, wy - dy) == center);

        if uniform {
            BiomeArea::Median
        } else {
            BiomeArea::Edge
        }
    }

    /// Forest density noise; lower means denser.
    pub fn forest_factor(&self, wx: f64, wy: f64) -> f64 {
        let frequency = 0.01 * 0.4;
        self.noise.fbm(wx * frequency, wy * frequency, 3, 1.6, 0.7)
    }

    pub fn in_forest(&self, wx: f64, wy: f64) -> bool {
        self.forest_factor(wx, wy) < 1.15
    }

    fn biome_noise(&self, offset: f64, wx: f64, wy: f64) -> f64 {
        self.noise
            .sample((offset + wx) * BIOME_FREQUENCY, (offset + wy) * BIOME_FREQUENCY)
    }

    /// Three octaves of noise products, each later octave scaled by the
    /// running total, minus a bias. Coordinates are already shifted.
    fn layered_height(&self, x: f64, y: f64) -> f64 {
        let n = |frequency: f64| self.noise.sample(x * frequency, y * frequency);
        let mut height = n(0.001) * n(0.0015);
        height += n(0.002) * n(0.003) * height * 0.9;
        height += n(0.005) * n(0.01) * 0.5 * height;
        height - 0.07
    }

    fn base_height(&self, wx: f64, wy: f64) -> f64 {
        let distance = length(wx, wy);
        let x = wx + TERRAIN_SHIFT + self.offset0;
        let y = wy + TERRAIN_SHIFT + self.offset1;
        let mut height = self.layered_height(x, y);

        let ridge_a = self.noise.sample(x * 0.0005 + 0.123, y * 0.0005 + 0.151_23);
        let ridge_b = self.noise.sample(x * 0.0005 + 0.321, y * 0.0005 + 0.231);
        let mut ridge = 1.0 - lerp_step(0.02, 0.12, (ridge_a - ridge_b).abs());
        ridge *= smooth_step(744.0, 1000.0, distance);
        height *= 1.0 - ridge;

        if distance > WORLD_RADIUS {
            height = lerp(height, -0.2, lerp_step(WORLD_RADIUS, WATER_EDGE, distance));
            let cliff = 10_490.0;
            if distance > cliff {
                height = lerp(height, -2.0, lerp_step(cliff, WATER_EDGE, distance));
            }
        }

        let min_mountain = self.params.min_mountain_distance;
        if distance < min_mountain && height > 0.28 {
            let t = clamp01((height - 0.28) / 0.1);
            height = lerp(
                lerp(0.28, 0.38, t),
                height,
                lerp_step(min_mountain - 400.0, min_mountain, distance),
            );
        }

        height
    }

    fn menu_height(&self, wx: f64, wy: f64) -> f64 {
        let base = self.layered_height(
            wx + TERRAIN_SHIFT + self.offset0,
            wy + TERRAIN_SHIFT + self.offset1,
        );

        let x = wx + TERRAIN_SHIFT + self.offset3;
        let y = wy + TERRAIN_SHIFT + self.offset3;
        let n = |frequency: f64| self.noise.sample(x * frequency, y * frequency);
        let mut detail = n(0.01) * n(0.02);
        detail += n(0.05) * n(0.1) * detail * 0.5;

        base + detail * 0.1 + n(0.1) * 0.01 + n(0.4) * 0.003
    }
}

#[inline]
fn length(x: f64, y: f64) -> f64 {
    det_sqrt(x * x + y * y)
}
