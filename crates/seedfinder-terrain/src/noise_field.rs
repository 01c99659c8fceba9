//! Smooth 2D noise primitive and the interpolation helpers used by the
//! world model.
//!
//! The permutation table is fixed; worlds differ only through the coordinate
//! offsets they add before sampling.

use std::fmt;

use noise::{NoiseFn, Perlin};

/// Permutation seed shared by every world.
const PERMUTATION_SEED: u32 = 0;

/// Deterministic 2D Perlin noise remapped to `[0.0, 1.0]`.
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(PERMUTATION_SEED),
        }
    }

    /// Sample the field at `(x, y)`. Output is in `[0.0, 1.0]`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self.perlin.get([x, y]);
        clamp01((raw + 1.0) * 0.5)
    }

    /// Fractal Brownian motion: `octaves` layers, each scaled in frequency by
    /// `lacunarity` and in amplitude by `gain`.
    ///
    /// Amplitudes start at 1 and are not normalized, so the result lies in
    /// `[0.0, sum of amplitudes]`.
    pub fn fbm(&self, x: f64, y: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let (mut px, mut py) = (x, y);

        for _ in 0..octaves {
            total += amplitude * self.sample(px, py);
            amplitude *= gain;
            px *= lacunarity;
            py *= lacunarity;
        }

        total
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("permutation_seed", &PERMUTATION_SEED)
            .finish()
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp to `[0.0, 1.0]`.
#[inline]
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Linear interpolation with `t` clamped to `[0.0, 1.0]`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * clamp01(t)
}

/// Position of `v` between `low` and `high`, clamped to `[0.0, 1.0]`.
#[inline]
pub fn lerp_step(low: f64, high: f64, v: f64) -> f64 {
    clamp01((v - low) / (high - low))
}

/// Hermite smoothstep of `x` between `min` and `max`.
#[inline]
pub fn smooth_step(min: f64, max: f64, x: f64) -> f64 {
    let t = clamp01((x - min) / (max - min));
    t * t * (3.0 - 2.0 * t)
}
