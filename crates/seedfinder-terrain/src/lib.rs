//! Deterministic world model: seed hashing, noise, biome classification, and
//! rasterization of a world into a biome grid.

mod biome;
mod map;
mod noise_field;
mod seed;
mod version;
mod world;

pub use biome::{Biome, BiomeArea, BiomeSet, ParseBiomeError};
pub use map::{BiomeGrid, MapSample, WORLD_EXTENT, sample_map};
pub use noise_field::{NoiseField, clamp01, lerp, lerp_step, smooth_step};
pub use seed::{det_atan2, det_sin, det_sqrt, stable_hash, world_rng};
pub use version::{VersionParams, WorldGenVersion};
pub use world::{MOUNTAIN_HEIGHT, SHALLOWS_HEIGHT, WATER_EDGE, WORLD_RADIUS, WorldModel};
