// src/world/generator.rs

use glam::IVec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::world::grid::VoxelGrid;
use crate::world::hash::hash3;
use crate::world::materials::{DIRT, GLASS, GRASS, STONE};

/// Cells below the surface that are still dirt rather than stone.
const DIRT_DEPTH: u32 = 3;

/// Roughly one in this many surface cells becomes glass.
const GLASS_RARITY: u32 = 61;

#[derive(Clone)]
pub struct WorldGen {
    pub seed: u32,
    density: Fbm<Perlin>,
}

impl WorldGen {
    pub fn new(seed: u32) -> Self {
        let density = Fbm::<Perlin>::new(seed)
            .set_octaves(4)
            .set_frequency(0.035);

        Self { seed, density }
    }

    /// Noise remapped to roughly [0, 1].
    #[inline]
    fn density_at(&self, x: i32, y: i32, z: i32) -> f32 {
        let v = self.density.get([x as f64, y as f64, z as f64]) as f32;
        (v * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// A cell is solid when its density stays under a threshold that shrinks with height.
    #[inline]
    fn is_solid(&self, x: i32, y: i32, z: i32, size: usize) -> bool {
        let attenuation = 1.0 - (y as f32 / size as f32);
        self.density_at(x, y, z) <= attenuation
    }

    /// Fills a `size`³ grid. Each column is walked top-down so the first solid cell
    /// under air becomes grass and the layers beneath dirt, then stone.
    pub fn generate(&self, size: usize, voxel_size: f32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(size, voxel_size);
        let n = size as i32;

        for z in 0..n {
            for x in 0..n {
                let mut depth: Option<u32> = None;

                for y in (0..n).rev() {
                    if !self.is_solid(x, y, z, size) {
                        depth = None;
                        continue;
                    }

                    let d = depth.map_or(0, |d| d + 1);
                    depth = Some(d);

                    let id = match d {
                        0 if hash3(self.seed, x, y, z) % GLASS_RARITY == 0 => GLASS,
                        0 => GRASS,
                        d if d <= DIRT_DEPTH => DIRT,
                        _ => STONE,
                    };
                    grid.set(IVec3::new(x, y, z), id);
                }
            }
        }

        log::info!(
            "Generated {size}^3 voxels (seed {}), non-air: {}",
            self.seed,
            grid.solid_count()
        );

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::AIR;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = WorldGen::new(7).generate(16, 1.0);
        let b = WorldGen::new(7).generate(16, 1.0);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn surface_cells_sit_under_air() {
        let g = WorldGen::new(3).generate(24, 1.0);
        let n = g.size() as i32;
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let c = IVec3::new(x, y, z);
                    let id = g.get(c);
                    if id == GRASS || id == GLASS {
                        assert_eq!(g.get(c + IVec3::Y), AIR, "surface cell at {c:?} is covered");
                    }
                }
            }
        }
    }

    #[test]
    fn bottom_is_mostly_solid_and_top_mostly_air() {
        let g = WorldGen::new(11).generate(32, 1.0);
        let n = g.size() as i32;
        let layer = |y: i32| {
            (0..n)
                .flat_map(|z| (0..n).map(move |x| (x, z)))
                .filter(|&(x, z)| g.get(IVec3::new(x, y, z)) != AIR)
                .count()
        };
        assert!(layer(0) > layer(n - 1));
    }
}
