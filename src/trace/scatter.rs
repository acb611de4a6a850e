// src/trace/scatter.rs
//
// Bounce model for the three material kinds.

use glam::Vec3;

use crate::trace::ray::{reflect, refract, schlick, Ray};
use crate::trace::rng::PixelRng;
use crate::trace::traversal::HitRecord;
use crate::world::materials::{Material, MaterialKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scatter {
    pub attenuation: Vec3,
    pub scattered: Ray,
    /// The bounce left the surface on the wrong side; the path carries no energy.
    pub absorbed: bool,
}

pub fn scatter(ray: &Ray, hit: &HitRecord, material: &Material, rng: &mut PixelRng) -> Scatter {
    match material.kind {
        MaterialKind::Diffuse => scatter_diffuse(hit, material, rng),
        MaterialKind::Metal => scatter_metal(ray, hit, material, rng),
        MaterialKind::Dielectric => scatter_dielectric(ray, hit, material, rng),
    }
}

fn scatter_diffuse(hit: &HitRecord, material: &Material, rng: &mut PixelRng) -> Scatter {
    let target = hit.position + hit.normal + rng.in_unit_sphere();
    let mut direction = target - hit.position;
    if direction.length_squared() < 1.0e-12 {
        direction = hit.normal;
    }

    Scatter {
        attenuation: material.albedo,
        scattered: Ray::new(hit.position, direction),
        absorbed: false,
    }
}

fn scatter_metal(ray: &Ray, hit: &HitRecord, material: &Material, rng: &mut PixelRng) -> Scatter {
    let mut direction = reflect(ray.direction.normalize(), hit.normal);
    if material.fuzz > 0.0 {
        direction += material.fuzz * rng.in_unit_sphere();
    }

    Scatter {
        attenuation: material.albedo,
        scattered: Ray::new(hit.position, direction),
        absorbed: direction.dot(hit.normal) <= 0.0,
    }
}

fn scatter_dielectric(ray: &Ray, hit: &HitRecord, material: &Material, rng: &mut PixelRng) -> Scatter {
    let ri = material.refractive_index;
    let d = ray.direction;
    let d_dot_n = d.dot(hit.normal);

    let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
        // Leaving the medium.
        let c = d_dot_n / d.length();
        let c = (1.0 - ri * ri * (1.0 - c * c)).max(0.0).sqrt();
        (-hit.normal, ri, c)
    } else {
        (hit.normal, 1.0 / ri, -d_dot_n / d.length())
    };

    let refracted = refract(d, outward_normal, ni_over_nt);
    let reflectance = match refracted {
        Some(_) => schlick(cosine, ri),
        None => 1.0,
    };

    let direction = match refracted {
        Some(r) if rng.next_f32() >= reflectance => r,
        _ => reflect(d.normalize(), hit.normal),
    };

    Scatter {
        attenuation: Vec3::ONE,
        scattered: Ray::new(hit.position, direction),
        absorbed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_with_normal(normal: Vec3) -> HitRecord {
        HitRecord {
            t: 1.0,
            position: Vec3::new(2.0, 0.5, 0.5),
            normal,
            material_id: 1,
            offset_id: 2,
        }
    }

    #[test]
    fn smooth_metal_obeys_mirror_law() {
        let metal = Material::metal(Vec3::splat(0.8), 0.0);
        let mut rng = PixelRng::new(0, 0, 0);

        for d in [
            Vec3::new(1.0, -1.0, 0.0).normalize(),
            Vec3::new(0.3, -0.9, 0.3).normalize(),
            Vec3::NEG_Y,
        ] {
            let n = Vec3::Y;
            let s = scatter(&Ray::new(Vec3::ZERO, d), &hit_with_normal(n), &metal, &mut rng);
            let expected = d - 2.0 * d.dot(n) * n;
            assert!((s.scattered.direction - expected).length() < 1e-6);
            assert_eq!(s.absorbed, s.scattered.direction.dot(n) <= 0.0);
            assert!(!s.absorbed);
            assert_eq!(s.attenuation, Vec3::splat(0.8));
        }
    }

    #[test]
    fn metal_hit_from_behind_is_absorbed() {
        // Incoming along the normal: the reflection points into the surface.
        let metal = Material::metal(Vec3::ONE, 0.0);
        let mut rng = PixelRng::new(0, 0, 0);
        let s = scatter(&Ray::new(Vec3::ZERO, Vec3::Y), &hit_with_normal(Vec3::Y), &metal, &mut rng);
        assert!(s.scattered.direction.dot(Vec3::Y) <= 0.0);
        assert!(s.absorbed);
    }

    #[test]
    fn diffuse_bounces_leave_the_surface() {
        let m = Material::diffuse(Vec3::new(0.2, 0.4, 0.6));
        let mut rng = PixelRng::new(4, 4, 9);
        for _ in 0..256 {
            let s = scatter(&Ray::new(Vec3::ZERO, Vec3::X), &hit_with_normal(Vec3::NEG_X), &m, &mut rng);
            assert!(!s.absorbed);
            assert_eq!(s.attenuation, m.albedo);
            // normal + point in unit sphere never points backwards past the tangent plane.
            assert!(s.scattered.direction.dot(Vec3::NEG_X) >= 0.0);
            assert_eq!(s.scattered.origin, Vec3::new(2.0, 0.5, 0.5));
        }
    }

    #[test]
    fn dielectric_is_white_and_never_absorbs() {
        let glass = Material::dielectric(1.5);
        let mut rng = PixelRng::new(1, 2, 3);
        let d = Vec3::new(0.4, -1.0, 0.0);
        let mut refracted = 0;
        for _ in 0..256 {
            let s = scatter(&Ray::new(Vec3::ZERO, d), &hit_with_normal(Vec3::Y), &glass, &mut rng);
            assert_eq!(s.attenuation, Vec3::ONE);
            assert!(!s.absorbed);
            if s.scattered.direction.y < 0.0 {
                refracted += 1;
            }
        }
        // Mostly transmits at this angle.
        assert!(refracted > 128);
    }

    #[test]
    fn dielectric_total_internal_reflection_always_reflects() {
        let glass = Material::dielectric(1.5);
        let mut rng = PixelRng::new(0, 0, 0);
        // Exiting (d·n > 0) at a grazing angle.
        let d = Vec3::new(1.0, 0.05, 0.0);
        for _ in 0..64 {
            let s = scatter(&Ray::new(Vec3::ZERO, d), &hit_with_normal(Vec3::Y), &glass, &mut rng);
            let expected = reflect(d.normalize(), Vec3::Y);
            assert!((s.scattered.direction - expected).length() < 1e-6);
        }
    }
}
