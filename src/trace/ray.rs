// src/trace/ray.rs

use glam::Vec3;

/// Direction need not be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// Mirror `v` about the plane with unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `v` through a surface with unit normal `n`.
/// Returns `None` on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance.
#[inline]
pub fn schlick(cosine: f32, refractive_index: f32) -> f32 {
    let r0 = (1.0 - refractive_index) / (1.0 + refractive_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_at_scales_unnormalized_direction() {
        let r = Ray::new(Vec3::ONE, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(r.point_at(0.5), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn schlick_at_normal_incidence_is_r0() {
        for ri in [1.0_f32, 1.33, 1.5, 2.4] {
            let r0 = ((1.0 - ri) / (1.0 + ri)).powi(2);
            assert!((schlick(1.0, ri) - r0).abs() < 1e-7, "ri={ri}");
        }
    }

    #[test]
    fn schlick_at_grazing_incidence_is_one() {
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn refract_straight_through_keeps_direction() {
        let out = refract(Vec3::NEG_Y, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!((out - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn refract_reports_total_internal_reflection() {
        // Grazing exit from a dense medium.
        let v = Vec3::new(1.0, -0.05, 0.0);
        assert!(refract(v, Vec3::Y, 1.5).is_none());
    }
}
