//! Seed hashing and deterministic generation utilities.
//!
//! Maps a seed string to a stable 32-bit hash, derives the world RNG from it,
//! and routes trigonometry through `libm` so worlds are bit-exact across
//! platforms and process restarts.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Seed hashing
// ---------------------------------------------------------------------------

/// Stable 32-bit hash of a seed string.
///
/// DJB2 with two interleaved accumulators: even UTF-16 code units feed the
/// first, odd ones the second. Hashing stops at the first NUL. The empty
/// string hashes to 0.
pub fn stable_hash(seed: &str) -> i32 {
    if seed.is_empty() {
        return 0;
    }

    let units: Vec<u16> = seed.encode_utf16().take_while(|&c| c != 0).collect();
    let mut even: i32 = 5381;
    let mut odd: i32 = 5381;

    for pair in units.chunks(2) {
        even = ((even << 5).wrapping_add(even)) ^ i32::from(pair[0]);
        if let Some(&next) = pair.get(1) {
            odd = ((odd << 5).wrapping_add(odd)) ^ i32::from(next);
        }
    }

    even.wrapping_add(odd.wrapping_mul(1_566_083_941))
}

/// Deterministic RNG for deriving a world's offsets from its seed hash.
///
/// Identical hashes always produce identical streams, regardless of thread
/// or platform.
pub fn world_rng(seed_hash: i32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(u64::from(seed_hash as u32))
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic atan2 using libm.
#[inline]
pub fn det_atan2(y: f64, x: f64) -> f64 {
    libm::atan2(y, x)
}

/// Deterministic sqrt using libm.
#[inline]
pub fn det_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_empty_seed_hashes_to_zero() {
        assert_eq!(stable_hash(""), 0);
    }

    #[test]
    fn test_known_hash_values() {
        assert_eq!(stable_hash("a"), 372_029_373);
        assert_eq!(stable_hash("ab"), 1_093_630_535);
        assert_eq!(stable_hash("abc"), 1_099_313_834);
        assert_eq!(stable_hash("vsf0"), -1_159_920_685);
        assert_eq!(stable_hash("HHcLC5acQt"), 298_112_588);
    }

    #[test]
    fn test_hash_stops_at_nul() {
        assert_eq!(stable_hash("ab\0zzz"), stable_hash("ab"));
    }

    #[test]
    fn test_adjacent_ids_hash_differently() {
        let a = stable_hash("vsf0");
        let b = stable_hash("vsf1");
        assert_ne!(a, b, "Consecutive seed ids must map to different worlds");
    }

    #[test]
    fn test_world_rng_deterministic() {
        let mut rng_a = world_rng(-1_159_920_685);
        let mut rng_b = world_rng(-1_159_920_685);

        for _ in 0..1000 {
            assert_eq!(
                rng_a.next_u64(),
                rng_b.next_u64(),
                "ChaCha8Rng sequences must match for same seed hash"
            );
        }
    }

    #[test]
    fn test_math_functions_hit_exact_values() {
        use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

        assert_eq!(det_sqrt(4.0).to_bits(), 2.0_f64.to_bits());
        assert_eq!(det_sqrt(2.0).to_bits(), SQRT_2.to_bits());
        assert!(det_sqrt(-1.0).is_nan());

        assert_eq!(det_sin(0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(det_sin(-0.0).to_bits(), (-0.0_f64).to_bits(), "Sign of zero is kept");
        assert_eq!(det_sin(FRAC_PI_2).to_bits(), 1.0_f64.to_bits());
        let x = 1.234_567_890_123_4;
        assert_eq!(det_sin(-x).to_bits(), (-det_sin(x)).to_bits());

        assert_eq!(det_atan2(1.0, 1.0).to_bits(), FRAC_PI_4.to_bits());
        assert_eq!(det_atan2(1.0, 0.0).to_bits(), FRAC_PI_2.to_bits());
        assert_eq!(det_atan2(0.0, -1.0).to_bits(), PI.to_bits());
    }
}
