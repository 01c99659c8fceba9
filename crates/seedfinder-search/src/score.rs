//! Region scoring: compare the biome mix around each contour with the
//! target profile and keep the best match.

use glam::{IVec2, Vec2};
use seedfinder_terrain::{Biome, BiomeGrid, WORLD_EXTENT, sample_map};

use crate::candidate::{Candidate, ScoringParams, SearchResult};
use crate::contour::{Contour, find_contours};
use crate::profile::Profile;

/// Half the side of the sampling window, in cells.
///
/// `size` is a world-space span; the window covers the same fraction of the
/// grid as `size` does of the full world width.
pub fn sampling_half_size(size: u32, resolution: usize) -> i32 {
    let world_width = 2.0 * WORLD_EXTENT;
    (f64::from(size) / world_width * resolution as f64 / 2.0).round() as i32
}

/// Observed profile of the `2·half_size` square window starting at
/// `center - half_size`.
///
/// Cells outside the grid are skipped, so the window is clipped to the grid
/// before it is walked. Returns `None` when the window holds no grid cell at
/// all.
pub fn observe_window(grid: &BiomeGrid, center: IVec2, half_size: i32) -> Option<Profile> {
    let resolution = i32::try_from(grid.resolution()).unwrap_or(i32::MAX);
    let clip = |c: i32| {
        let start = (-half_size).max(c.saturating_neg());
        let end = half_size.min(resolution.saturating_sub(c));
        start..end
    };

    let mut counts = [0u32; Biome::COUNT];
    for dx in clip(center.x) {
        for dz in clip(center.y) {
            if let Some(biome) = grid.get(center + IVec2::new(dx, dz)) {
                counts[biome.index()] += 1;
            }
        }
    }
    Profile::from_histogram(&counts)
}

/// Mean over enabled target entries of `1 - |observed - target|`.
///
/// Always in `[0, 1]` for weights in `[0, 1]`; 0 if nothing is enabled.
pub fn score_profile(observed: &Profile, target: &Profile) -> f32 {
    let (total, count) = target.enabled().fold((0.0_f32, 0_u32), |(total, count), entry| {
        let diff = (observed.weight(entry.biome) - entry.weight).abs();
        (total + 1.0 - diff, count + 1)
    });

    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}

/// The winning contour of a candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionScore {
    pub score: f32,
    pub profile: Profile,
    pub center: IVec2,
}

/// Score every contour and return the best one scoring above zero.
///
/// Contours whose window falls entirely outside the grid are skipped.
pub fn best_region(
    grid: &BiomeGrid,
    contours: &[Contour],
    target: &Profile,
    half_size: i32,
) -> Option<RegionScore> {
    let mut best: Option<RegionScore> = None;

    for contour in contours {
        let Some(observed) = observe_window(grid, contour.center, half_size) else {
            continue;
        };
        let score = score_profile(&observed, target);
        let best_score = best.as_ref().map_or(0.0, |b| b.score);
        if score > best_score {
            best = Some(RegionScore {
                score,
                profile: observed,
                center: contour.center,
            });
        }
    }

    best
}

/// World-space position of a grid cell, relative to the map center.
pub fn centroid_world_position(resolution: usize, center: IVec2) -> Vec2 {
    let half = (resolution / 2) as i32;
    let offset = (center - IVec2::splat(half)).as_vec2();
    offset / resolution as f32 * (2.0 * WORLD_EXTENT) as f32
}

/// Score one candidate: sample its map, extract contours, keep the best.
///
/// Pure given its inputs; safe to run on any thread.
pub fn evaluate(candidate: Candidate, params: ScoringParams, target: &Profile) -> SearchResult {
    let sample = sample_map(&candidate.world, params.resolution, params.center_biome);
    let contours = find_contours(
        &sample.grid,
        &sample.center_cells,
        &target.adjacency_requirements(),
    );
    let half_size = sampling_half_size(params.size, params.resolution);

    let (score, profile, world_position) =
        match best_region(&sample.grid, &contours, target, half_size) {
            Some(best) => (
                best.score,
                Some(best.profile),
                centroid_world_position(params.resolution, best.center),
            ),
            None => (0.0, None, Vec2::ZERO),
        };

    SearchResult {
        seed: candidate.seed,
        world: candidate.world,
        params,
        score,
        profile,
        world_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::extract_contours;

    const EPSILON: f32 = 1e-6;

    fn meadows_only() -> Profile {
        let mut target = Profile::new();
        target.set_target(Biome::Meadows, 1.0).unwrap();
        target
    }

    #[test]
    fn test_half_size_rounds() {
        assert_eq!(sampling_half_size(1000, 120), 3);
        assert_eq!(sampling_half_size(1000, 100), 3, "2.5 rounds away from zero");
        assert_eq!(sampling_half_size(0, 500), 0);
        assert_eq!(sampling_half_size(20_000, 50), 25);
    }

    #[test]
    fn test_window_outside_grid_is_excluded() {
        let grid = BiomeGrid::filled(8, Biome::Meadows);
        assert!(observe_window(&grid, IVec2::new(100, 100), 3).is_none());
        assert!(observe_window(&grid, IVec2::new(4, 4), 0).is_none(), "Empty window");
    }

    #[test]
    fn test_window_clipped_at_grid_edge() {
        let grid = BiomeGrid::filled(8, Biome::Meadows);
        let observed = observe_window(&grid, IVec2::new(0, 0), 2).unwrap();
        assert!((observed.weight(Biome::Meadows) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_huge_window_is_clipped_to_grid() {
        let mut grid = BiomeGrid::filled(20, Biome::Meadows);
        for x in 0..20 {
            grid.set(IVec2::new(x, 3), Biome::Swamp);
        }
        let half_size = sampling_half_size(400_000_000, 20);
        assert_eq!(half_size, 200_000);

        let started = std::time::Instant::now();
        let huge = observe_window(&grid, IVec2::new(10, 10), half_size).unwrap();
        assert!(
            started.elapsed() < std::time::Duration::from_secs(1),
            "Window walk took {:?}",
            started.elapsed()
        );

        // Half size 10 around (10, 10) already spans the whole grid.
        let whole = observe_window(&grid, IVec2::new(10, 10), 10).unwrap();
        assert_eq!(huge, whole);
        assert!((huge.weight(Biome::Swamp) - 0.05).abs() < EPSILON);
    }

    #[test]
    fn test_window_clipping_matches_cell_by_cell_walk() {
        let mut grid = BiomeGrid::filled(9, Biome::Plains);
        grid.set(IVec2::new(0, 0), Biome::Ocean);
        grid.set(IVec2::new(8, 8), Biome::Mountain);
        grid.set(IVec2::new(2, 7), Biome::Swamp);

        for center in [IVec2::new(0, 0), IVec2::new(8, 1), IVec2::new(4, 4), IVec2::new(-3, 10)] {
            for half_size in [1, 3, 6] {
                let mut counts = [0u32; Biome::COUNT];
                for dx in -half_size..half_size {
                    for dz in -half_size..half_size {
                        if let Some(biome) = grid.get(center + IVec2::new(dx, dz)) {
                            counts[biome.index()] += 1;
                        }
                    }
                }
                assert_eq!(
                    observe_window(&grid, center, half_size),
                    Profile::from_histogram(&counts),
                    "center {center}, half size {half_size}"
                );
            }
        }
    }

    #[test]
    fn test_perfect_match_scores_one() {
        let grid = BiomeGrid::filled(8, Biome::Meadows);
        let observed = observe_window(&grid, IVec2::new(4, 4), 2).unwrap();
        assert!((score_profile(&observed, &meadows_only()) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_score_averages_enabled_entries() {
        let mut grid = BiomeGrid::filled(4, Biome::Meadows);
        for x in 0..4 {
            grid.set(IVec2::new(x, 0), Biome::Ocean);
        }
        // Window covers the whole grid: 12 Meadows, 4 Ocean.
        let observed = observe_window(&grid, IVec2::new(2, 2), 2).unwrap();

        let mut target = Profile::new();
        target.set_target(Biome::Meadows, 0.5).unwrap();
        target.set_target(Biome::Ocean, 0.5).unwrap();

        // (1 - 0.25 + 1 - 0.25) / 2
        assert!((score_profile(&observed, &target) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_no_enabled_entries_scores_zero() {
        let grid = BiomeGrid::filled(4, Biome::Meadows);
        let observed = observe_window(&grid, IVec2::new(2, 2), 2).unwrap();
        assert_eq!(score_profile(&observed, &Profile::new()), 0.0);
    }

    #[test]
    fn test_score_bounds_for_extreme_targets() {
        let grid = BiomeGrid::filled(4, Biome::Ocean);
        let observed = observe_window(&grid, IVec2::new(2, 2), 2).unwrap();
        let score = score_profile(&observed, &meadows_only());
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(score, 0.0, "Fully opposite composition scores zero");
    }

    #[test]
    fn test_best_region_prefers_closest_match() {
        // Left half Meadows, right half Swamp; two Meadows islands of different purity.
        let mut grid = BiomeGrid::filled(20, Biome::Swamp);
        for y in 0..20 {
            for x in 0..8 {
                grid.set(IVec2::new(x, y), Biome::Meadows);
            }
        }
        for y in 8..11 {
            for x in 15..18 {
                grid.set(IVec2::new(x, y), Biome::Meadows);
            }
        }
        let contours = extract_contours(&grid, &grid.cells_of(Biome::Meadows));
        assert_eq!(contours.len(), 2);

        let best = best_region(&grid, &contours, &meadows_only(), 2).unwrap();
        assert!(best.center.x < 8, "The all-Meadows region should win, got {}", best.center);
        assert!((best.score - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_centroid_world_position() {
        assert_eq!(centroid_world_position(100, IVec2::new(50, 50)), Vec2::ZERO);
        assert_eq!(
            centroid_world_position(100, IVec2::new(75, 25)),
            Vec2::new(5000.0, -5000.0)
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let params = ScoringParams {
            resolution: 50,
            size: 2000,
            center_biome: Biome::Meadows,
            epoch: 0,
        };
        let a = evaluate(Candidate::new("vsf0"), params, &meadows_only());
        let b = evaluate(Candidate::new("vsf0"), params, &meadows_only());
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.profile, b.profile);
        assert_eq!(a.world_position, b.world_position);
        assert!((0.0..=1.0).contains(&a.score));
    }

    #[test]
    fn test_evaluate_without_contours_scores_zero() {
        let params = ScoringParams {
            // The four corners lie outside the world radius, leaving at most
            // five center cells: too few for any contour.
            resolution: 3,
            size: 10_000,
            center_biome: Biome::Meadows,
            epoch: 0,
        };

        let result = evaluate(Candidate::new("vsf0"), params, &meadows_only());
        assert_eq!(result.score, 0.0);
        assert!(result.profile.is_none());
        assert_eq!(result.world_position, Vec2::ZERO);
    }
}
