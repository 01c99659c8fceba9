//! Rasterization of a world into a square biome grid.

use glam::IVec2;

use crate::biome::Biome;
use crate::seed::det_sqrt;
use crate::world::{WORLD_RADIUS, WorldModel};

/// Half-extent of the sampled square in world units. The grid spans
/// `[-WORLD_EXTENT, WORLD_EXTENT]` on both axes.
pub const WORLD_EXTENT: f64 = 10_000.0;

/// Square grid of biomes indexed by `(x, z)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BiomeGrid {
    resolution: usize,
    cells: Vec<Biome>,
}

impl BiomeGrid {
    /// A grid filled with `fill`.
    pub fn filled(resolution: usize, fill: Biome) -> Self {
        Self {
            resolution,
            cells: vec![fill; resolution * resolution],
        }
    }

    /// Build from row-major cells (`z * resolution + x`).
    ///
    /// Returns `None` if `cells.len() != resolution * resolution`.
    pub fn from_cells(resolution: usize, cells: Vec<Biome>) -> Option<Self> {
        (cells.len() == resolution * resolution).then_some(Self { resolution, cells })
    }

    /// Cells per side.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// `true` if `cell` lies inside the grid.
    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        let r = self.resolution as i32;
        cell.x >= 0 && cell.y >= 0 && cell.x < r && cell.y < r
    }

    /// Biome at `cell`, or `None` (the option) if out of bounds.
    #[inline]
    pub fn get(&self, cell: IVec2) -> Option<Biome> {
        self.contains(cell).then(|| self.cells[self.index(cell)])
    }

    /// Overwrite the biome at `cell`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: IVec2, biome: Biome) {
        if self.contains(cell) {
            let i = self.index(cell);
            self.cells[i] = biome;
        }
    }

    /// Every cell holding `biome`, in row-major order.
    pub fn cells_of(&self, biome: Biome) -> Vec<IVec2> {
        self.iter().filter(|(_, b)| *b == biome).map(|(c, _)| c).collect()
    }

    /// All cells with their biomes, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Biome)> + '_ {
        let r = self.resolution;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &b)| (IVec2::new((i % r) as i32, (i / r) as i32), b))
    }

    #[inline]
    fn index(&self, cell: IVec2) -> usize {
        cell.y as usize * self.resolution + cell.x as usize
    }
}

/// A rasterized world plus the cells that hold the center biome.
#[derive(Clone, Debug)]
pub struct MapSample {
    pub grid: BiomeGrid,
    /// Cells whose effective biome equals the requested center biome, row-major.
    pub center_cells: Vec<IVec2>,
}

/// World coordinate of grid index `i` along one axis.
#[inline]
fn grid_to_world(i: usize, resolution: usize) -> f64 {
    let span = (resolution.max(2) - 1) as f64;
    (i as f64 / span * 2.0 - 1.0) * WORLD_EXTENT
}

/// Rasterize `world` into a `resolution × resolution` grid.
///
/// Cells farther than [`WORLD_RADIUS`] from the origin are [`Biome::None`];
/// all others carry the Shallows-reclassified biome.
pub fn sample_map(world: &WorldModel, resolution: usize, center_biome: Biome) -> MapSample {
    let mut cells = Vec::with_capacity(resolution * resolution);
    let mut center_cells = Vec::new();

    for z in 0..resolution {
        let wz = grid_to_world(z, resolution);
        for x in 0..resolution {
            let wx = grid_to_world(x, resolution);
            let biome = if det_sqrt(wx * wx + wz * wz) > WORLD_RADIUS {
                Biome::None
            } else {
                world.effective_biome_at(wx, wz)
            };

            if biome == center_biome {
                center_cells.push(IVec2::new(x as i32, z as i32));
            }
            cells.push(biome);
        }
    }

    MapSample {
        grid: BiomeGrid { resolution, cells },
        center_cells,
    }
}
