// src/render/gbuffer.rs
//
// Per-pixel buffers produced by the primary trace and the temporal pass.

use glam::Vec3;

use crate::error::{RenderError, Result};
use crate::trace::PathSample;
use crate::world::AIR;

/// Maps a unit normal from [-1,1]³ to [0,1]³.
#[inline]
pub fn encode_normal(n: Vec3) -> Vec3 {
    n * 0.5 + Vec3::splat(0.5)
}

/// Output of the primary trace for one pixel: raw color plus the first-hit record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracedTexel {
    pub color: Vec3,
    pub position: Vec3,
    /// Encoded first-hit normal.
    pub normal: Vec3,
    pub material_id: u8,
    pub offset_id: i32,
}

impl Default for TracedTexel {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            position: Vec3::ZERO,
            normal: encode_normal(Vec3::ZERO),
            material_id: AIR,
            offset_id: 0,
        }
    }
}

impl TracedTexel {
    pub fn from_sample(sample: &PathSample) -> Self {
        match sample.first_hit {
            Some(hit) => Self {
                color: sample.color,
                position: hit.position,
                normal: encode_normal(hit.normal),
                material_id: hit.material_id,
                offset_id: hit.offset_id,
            },
            None => Self {
                color: sample.color,
                ..Self::default()
            },
        }
    }

    #[inline]
    pub fn is_background(&self) -> bool {
        self.material_id == AIR
    }
}

/// One G-buffer entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GBufferTexel {
    pub color: Vec3,
    pub normal: Vec3,
    pub material_id: u8,
    pub offset_id: i32,
    /// 0 = final, 1 = history was just reset.
    pub cache_tail: f32,
}

impl Default for GBufferTexel {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            normal: encode_normal(Vec3::ZERO),
            material_id: AIR,
            offset_id: 0,
            cache_tail: 0.0,
        }
    }
}

impl GBufferTexel {
    /// Same surface as far as history reuse and filtering are concerned.
    #[inline]
    pub fn same_surface(&self, material_id: u8, offset_id: i32, normal: Vec3, eps: f32) -> bool {
        self.material_id == material_id
            && self.offset_id == offset_id
            && self.normal.distance(normal) < eps
    }
}

/// Checked `width * height`.
pub fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<GBufferTexel>())
        .ok_or(RenderError::Allocation { width, height })
}

#[derive(Clone, Debug)]
pub struct GBuffer {
    width: u32,
    height: u32,
    texels: Vec<GBufferTexel>,
}

impl GBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let n = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            texels: vec![GBufferTexel::default(); n],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> &GBufferTexel {
        &self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Read with coordinates clamped to the edge.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> &GBufferTexel {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(cx, cy)
    }

    pub fn texels(&self) -> &[GBufferTexel] {
        &self.texels
    }

    pub fn texels_mut(&mut self) -> &mut [GBufferTexel] {
        &mut self.texels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::HitRecord;

    #[test]
    fn normals_encode_into_unit_cube() {
        assert_eq!(encode_normal(Vec3::NEG_X), Vec3::new(0.0, 0.5, 0.5));
        assert_eq!(encode_normal(Vec3::Y), Vec3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn background_sample_has_air_material() {
        let t = TracedTexel::from_sample(&PathSample {
            color: Vec3::ONE,
            first_hit: None,
        });
        assert!(t.is_background());
        assert_eq!(t.color, Vec3::ONE);
    }

    #[test]
    fn hit_sample_carries_first_hit_fields() {
        let hit = HitRecord {
            t: 1.5,
            position: Vec3::new(2.0, 0.5, 0.5),
            normal: Vec3::NEG_X,
            material_id: 3,
            offset_id: 2,
        };
        let t = TracedTexel::from_sample(&PathSample {
            color: Vec3::splat(0.25),
            first_hit: Some(hit),
        });
        assert_eq!(t.material_id, 3);
        assert_eq!(t.offset_id, 2);
        assert_eq!(t.normal, Vec3::new(0.0, 0.5, 0.5));
        assert_eq!(t.position, hit.position);
    }

    #[test]
    fn clamped_reads_stay_on_the_image() {
        let mut g = GBuffer::new(3, 2).unwrap();
        g.texels_mut()[2].material_id = 7; // (2, 0)
        assert_eq!(g.get_clamped(10, -4).material_id, 7);
        assert_eq!(g.get_clamped(-1, 0).material_id, AIR);
    }

    #[test]
    fn oversized_buffers_fail_to_allocate() {
        assert!(pixel_count(u32::MAX, u32::MAX).is_err());
    }
}
