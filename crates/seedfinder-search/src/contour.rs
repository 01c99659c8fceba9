//! Connected regions of the center biome.
//!
//! Center-biome cells are partitioned into maximal 4-connected components by
//! a breadth-first flood fill. Components that are too small, or that do not
//! border every required biome, are then filtered out.

use std::collections::VecDeque;

use glam::IVec2;
use seedfinder_terrain::{Biome, BiomeGrid, BiomeSet};

/// Contours with fewer cells than this are discarded.
pub const MIN_CONTOUR_CELLS: usize = 6;

const NEIGHBORS: [IVec2; 4] = [
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
];

/// A maximal 4-connected group of center-biome cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    /// Mean cell coordinate, truncated toward zero.
    pub center: IVec2,
    /// Member cells in flood-fill order.
    pub points: Vec<IVec2>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Partition `center_cells` into contours.
///
/// Every input cell ends up in exactly one contour. Cells outside the grid
/// are ignored.
pub fn extract_contours(grid: &BiomeGrid, center_cells: &[IVec2]) -> Vec<Contour> {
    let resolution = grid.resolution();
    let index = |c: IVec2| c.y as usize * resolution + c.x as usize;

    let mut unassigned = vec![false; resolution * resolution];
    for &cell in center_cells.iter().filter(|c| grid.contains(**c)) {
        unassigned[index(cell)] = true;
    }

    let mut contours = Vec::new();
    let mut frontier = VecDeque::new();

    for &seed in center_cells {
        if !grid.contains(seed) || !unassigned[index(seed)] {
            continue;
        }

        unassigned[index(seed)] = false;
        frontier.push_back(seed);

        let mut points = Vec::new();
        let mut sum_x: i64 = 0;
        let mut sum_y: i64 = 0;

        while let Some(cell) = frontier.pop_front() {
            points.push(cell);
            sum_x += i64::from(cell.x);
            sum_y += i64::from(cell.y);

            for offset in NEIGHBORS {
                let next = cell + offset;
                if grid.contains(next) && unassigned[index(next)] {
                    unassigned[index(next)] = false;
                    frontier.push_back(next);
                }
            }
        }

        let count = points.len() as i64;
        let center = IVec2::new((sum_x / count) as i32, (sum_y / count) as i32);
        contours.push(Contour { center, points });
    }

    contours
}

/// Union of the biomes found in the four neighbors of every contour cell.
///
/// Neighbors outside the grid count as [`Biome::None`].
pub fn neighbor_biomes(grid: &BiomeGrid, contour: &Contour) -> BiomeSet {
    let mut seen = BiomeSet::new();
    for &cell in &contour.points {
        for offset in NEIGHBORS {
            seen.insert(grid.get(cell + offset).unwrap_or(Biome::None));
        }
    }
    seen
}

/// Keep contours with at least [`MIN_CONTOUR_CELLS`] cells that border every
/// biome in `required`.
pub fn filter_contours(
    grid: &BiomeGrid,
    contours: Vec<Contour>,
    required: &BiomeSet,
) -> Vec<Contour> {
    contours
        .into_iter()
        .filter(|c| c.len() >= MIN_CONTOUR_CELLS)
        .filter(|c| required.is_empty() || neighbor_biomes(grid, c).is_superset(required))
        .collect()
}

/// [`extract_contours`] followed by [`filter_contours`].
pub fn find_contours(grid: &BiomeGrid, center_cells: &[IVec2], required: &BiomeSet) -> Vec<Contour> {
    filter_contours(grid, extract_contours(grid, center_cells), required)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use seedfinder_terrain::{WorldModel, sample_map};

    /// `size × size` Meadows grid with a `w × h` island of `biome` at `origin`.
    fn island_grid(size: usize, origin: IVec2, w: i32, h: i32, biome: Biome) -> BiomeGrid {
        let mut grid = BiomeGrid::filled(size, Biome::Meadows);
        for y in 0..h {
            for x in 0..w {
                grid.set(origin + IVec2::new(x, y), biome);
            }
        }
        grid
    }

    #[test]
    fn test_single_island_centroid_is_geometric_center() {
        let grid = island_grid(10, IVec2::new(3, 4), 3, 3, Biome::Swamp);
        let cells = grid.cells_of(Biome::Swamp);

        let contours = extract_contours(&grid, &cells);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].center, IVec2::new(4, 5));
        assert_eq!(contours[0].len(), 9);

        let kept = filter_contours(&grid, contours, &BiomeSet::new());
        assert_eq!(kept.len(), 1, "A 9-cell island survives the size filter");
    }

    #[test]
    fn test_small_island_is_discarded() {
        let grid = island_grid(10, IVec2::new(2, 2), 2, 2, Biome::Swamp);
        let cells = grid.cells_of(Biome::Swamp);

        let contours = extract_contours(&grid, &cells);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].center, IVec2::new(2, 2), "Mean 2.5 truncates to 2");

        let kept = filter_contours(&grid, contours, &BiomeSet::new());
        assert!(kept.is_empty(), "A 4-cell island is below the size threshold");
    }

    #[test]
    fn test_diagonal_cells_are_not_connected() {
        let mut grid = BiomeGrid::filled(4, Biome::Meadows);
        grid.set(IVec2::new(0, 0), Biome::Ocean);
        grid.set(IVec2::new(1, 1), Biome::Ocean);
        let contours = extract_contours(&grid, &grid.cells_of(Biome::Ocean));
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_contours_partition_center_cells() {
        let world = WorldModel::new("vsf11");
        let sample = sample_map(&world, 60, Biome::Meadows);
        let contours = extract_contours(&sample.grid, &sample.center_cells);

        let mut seen = HashSet::new();
        let mut total = 0;
        for contour in &contours {
            for &p in &contour.points {
                assert!(seen.insert(p), "Cell {p} appears in two contours");
                total += 1;
            }
        }
        let expected: HashSet<IVec2> = sample.center_cells.iter().copied().collect();
        assert_eq!(total, expected.len());
        assert_eq!(seen, expected, "Contours must exactly cover the center-biome cells");
    }

    #[test]
    fn test_adjacency_requirement_filters_contours() {
        // 3x3 Swamp island; one of its neighbors is Ocean.
        let mut grid = island_grid(10, IVec2::new(3, 3), 3, 3, Biome::Swamp);
        grid.set(IVec2::new(6, 4), Biome::Ocean);
        let cells = grid.cells_of(Biome::Swamp);

        let needs_ocean: BiomeSet = [Biome::Ocean].into_iter().collect();
        let needs_mountain: BiomeSet = [Biome::Mountain].into_iter().collect();
        let needs_both: BiomeSet = [Biome::Ocean, Biome::Meadows].into_iter().collect();

        assert_eq!(find_contours(&grid, &cells, &needs_ocean).len(), 1);
        assert!(find_contours(&grid, &cells, &needs_mountain).is_empty());
        assert_eq!(find_contours(&grid, &cells, &needs_both).len(), 1);
    }

    #[test]
    fn test_grid_edge_neighbors_count_as_none() {
        let grid = island_grid(6, IVec2::new(0, 0), 3, 3, Biome::Plains);
        let contours = extract_contours(&grid, &grid.cells_of(Biome::Plains));
        let seen = neighbor_biomes(&grid, &contours[0]);
        assert!(seen.contains(Biome::None));
        assert!(seen.contains(Biome::Meadows));
        assert!(seen.contains(Biome::Plains), "Interior neighbors are the contour itself");
    }
}
