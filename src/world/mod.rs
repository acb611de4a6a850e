pub mod generator;
pub mod grid;
pub mod hash;
pub mod materials;

pub use generator::WorldGen;
pub use grid::{VoxelGrid, AIR};
pub use materials::{Material, MaterialKind, MaterialTable};

/// Static per-frame scene data: the grid and the table its ids index.
#[derive(Clone, Debug)]
pub struct Scene {
    pub grid: VoxelGrid,
    pub materials: MaterialTable,
}

impl Scene {
    pub fn new(grid: VoxelGrid, materials: MaterialTable) -> Self {
        Self { grid, materials }
    }

    /// Procedural world with the standard palette.
    pub fn generated(seed: u32, size: usize, voxel_size: f32) -> Self {
        let grid = WorldGen::new(seed).generate(size, voxel_size);
        Self::new(grid, MaterialTable::standard())
    }
}
