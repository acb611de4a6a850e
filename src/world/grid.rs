// src/world/grid.rs
//
// Dense cubic grid of material ids. Id 0 is air.

use glam::IVec3;

use crate::error::{RenderError, Result};

pub const AIR: u8 = 0;

#[derive(Clone, Debug)]
pub struct VoxelGrid {
    size: usize,
    voxel_size: f32,
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// All-air grid of `size`³ cells.
    pub fn new(size: usize, voxel_size: f32) -> Self {
        Self {
            size,
            voxel_size,
            cells: vec![AIR; size * size * size],
        }
    }

    /// Wraps an existing cell array laid out x-fastest, then y, then z.
    pub fn from_cells(size: usize, voxel_size: f32, cells: Vec<u8>) -> Result<Self> {
        let expected = size * size * size;
        if cells.len() != expected {
            return Err(RenderError::GridShape {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, voxel_size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    #[inline]
    fn index(&self, c: IVec3) -> Option<usize> {
        let n = self.size as i32;
        if c.x < 0 || c.y < 0 || c.z < 0 || c.x >= n || c.y >= n || c.z >= n {
            return None;
        }
        let (x, y, z) = (c.x as usize, c.y as usize, c.z as usize);
        Some(x + y * self.size + z * self.size * self.size)
    }

    /// Material id at `c`; cells outside the grid read as air.
    #[inline]
    pub fn get(&self, c: IVec3) -> u8 {
        match self.index(c) {
            Some(i) => self.cells[i],
            None => AIR,
        }
    }

    /// Writes are ignored outside the grid.
    pub fn set(&mut self, c: IVec3, id: u8) {
        if let Some(i) = self.index(c) {
            self.cells[i] = id;
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != AIR).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_air() {
        let mut g = VoxelGrid::new(4, 1.0);
        g.set(IVec3::new(0, 0, 0), 3);
        assert_eq!(g.get(IVec3::new(0, 0, 0)), 3);
        assert_eq!(g.get(IVec3::new(-1, 0, 0)), AIR);
        assert_eq!(g.get(IVec3::new(4, 0, 0)), AIR);
        assert_eq!(g.get(IVec3::new(0, 0, 99)), AIR);
    }

    #[test]
    fn layout_is_x_fastest() {
        let mut cells = vec![0u8; 8];
        cells[1] = 1; // (1,0,0)
        cells[2] = 2; // (0,1,0)
        cells[4] = 3; // (0,0,1)
        let g = VoxelGrid::from_cells(2, 1.0, cells).unwrap();
        assert_eq!(g.get(IVec3::new(1, 0, 0)), 1);
        assert_eq!(g.get(IVec3::new(0, 1, 0)), 2);
        assert_eq!(g.get(IVec3::new(0, 0, 1)), 3);
        assert_eq!(g.solid_count(), 3);
    }

    #[test]
    fn wrong_cell_count_is_rejected() {
        let err = VoxelGrid::from_cells(2, 1.0, vec![0; 7]).unwrap_err();
        assert!(matches!(err, RenderError::GridShape { expected: 8, actual: 7 }));
    }
}
