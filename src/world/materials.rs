// src/world/materials.rs
//
// Fixed-capacity material table indexed by voxel id.

use glam::Vec3;

use crate::config::NUMBER_OF_MATERIALS;
use crate::error::{RenderError, Result};

/// Material ids used by the generated world.
pub const GRASS: u8 = 1;
pub const DIRT: u8 = 2;
pub const STONE: u8 = 3;
pub const GLASS: u8 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialKind {
    #[default]
    Diffuse,
    Metal,
    Dielectric,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub albedo: Vec3,
    pub fuzz: f32,
    pub refractive_index: f32,
    pub kind: MaterialKind,
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Vec3::ZERO)
    }
}

impl Material {
    pub fn diffuse(albedo: Vec3) -> Self {
        Self {
            albedo,
            fuzz: 0.0,
            refractive_index: 1.0,
            kind: MaterialKind::Diffuse,
        }
    }

    pub fn metal(albedo: Vec3, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
            refractive_index: 1.0,
            kind: MaterialKind::Metal,
        }
    }

    pub fn dielectric(refractive_index: f32) -> Self {
        Self {
            albedo: Vec3::ONE,
            fuzz: 0.0,
            refractive_index: refractive_index.max(1.0),
            kind: MaterialKind::Dielectric,
        }
    }
}

/// `0xRRGGBB` to linear [0,1] rgb.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Immutable once built; replaced wholesale on rebuild.
#[derive(Clone, Debug)]
pub struct MaterialTable {
    entries: [Material; NUMBER_OF_MATERIALS],
}

impl MaterialTable {
    /// `materials[0]` is the air slot and is never sampled.
    pub fn new(materials: &[Material]) -> Result<Self> {
        if materials.len() > NUMBER_OF_MATERIALS {
            return Err(RenderError::MaterialTableFull {
                capacity: NUMBER_OF_MATERIALS,
                actual: materials.len(),
            });
        }
        let mut entries = [Material::default(); NUMBER_OF_MATERIALS];
        entries[..materials.len()].copy_from_slice(materials);
        Ok(Self { entries })
    }

    /// Palette of the generated world.
    pub fn standard() -> Self {
        let mut entries = [Material::default(); NUMBER_OF_MATERIALS];
        entries[GRASS as usize] = Material::diffuse(rgb_hex(0x71aa34));
        entries[DIRT as usize] = Material::diffuse(rgb_hex(0xa05b53));
        entries[STONE as usize] = Material::metal(rgb_hex(0x7d7071), 0.1);
        entries[GLASS as usize] = Material::dielectric(1.5);
        Self { entries }
    }

    /// Ids past the capacity resolve to the (black diffuse) air slot.
    #[inline]
    pub fn get(&self, id: u8) -> &Material {
        self.entries.get(id as usize).unwrap_or(&self.entries[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_too_many_entries() {
        let many = vec![Material::default(); NUMBER_OF_MATERIALS + 1];
        assert!(MaterialTable::new(&many).is_err());
    }

    #[test]
    fn unknown_ids_fall_back_to_slot_zero() {
        let t = MaterialTable::standard();
        assert_eq!(t.get(200), t.get(0));
        assert_eq!(t.get(STONE).kind, MaterialKind::Metal);
        assert_eq!(t.get(GLASS).kind, MaterialKind::Dielectric);
    }

    #[test]
    fn hex_colors_normalize() {
        let c = rgb_hex(0xff0080);
        assert_eq!(c.x, 1.0);
        assert_eq!(c.y, 0.0);
        assert!((c.z - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn constructors_clamp_parameters() {
        assert_eq!(Material::metal(Vec3::ONE, 3.0).fuzz, 1.0);
        assert_eq!(Material::dielectric(0.5).refractive_index, 1.0);
    }
}
