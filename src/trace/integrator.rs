// src/trace/integrator.rs
//
// Bounded bounce loop. The primary bounce is kept for the G-buffer; every
// bounce multiplies the running throughput by the surface attenuation.

use glam::Vec3;

use crate::trace::ray::Ray;
use crate::trace::rng::PixelRng;
use crate::trace::scatter::scatter;
use crate::trace::traversal::{traverse, HitRecord};
use crate::world::Scene;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    pub color: Vec3,
    /// `None` when the primary ray escaped to the sky.
    pub first_hit: Option<HitRecord>,
}

/// Vertical white-to-blue gradient.
pub fn background(ray: &Ray) -> Vec3 {
    let t = (0.5 * (ray.direction.normalize_or_zero().y + 1.0)).clamp(0.0, 1.0);
    Vec3::ONE.lerp(Vec3::new(0.5, 0.7, 1.0), t)
}

/// Traces one path of at most `maximum_depth` bounces. Exhausting the budget
/// returns black: the remaining energy is treated as absorbed.
pub fn integrate(primary: Ray, scene: &Scene, maximum_depth: u32, rng: &mut PixelRng) -> PathSample {
    let Some(first_hit) = traverse(&primary, &scene.grid) else {
        return PathSample {
            color: background(&primary),
            first_hit: None,
        };
    };

    let mut throughput = Vec3::ONE;
    let mut ray = primary;
    let mut hit = first_hit;
    let mut depth = 0;

    loop {
        let material = scene.materials.get(hit.material_id);
        let bounce = scatter(&ray, &hit, material, rng);
        depth += 1;

        if bounce.absorbed {
            return PathSample {
                color: Vec3::ZERO,
                first_hit: Some(first_hit),
            };
        }

        throughput *= bounce.attenuation;
        ray = bounce.scattered;

        if depth >= maximum_depth {
            return PathSample {
                color: Vec3::ZERO,
                first_hit: Some(first_hit),
            };
        }

        match traverse(&ray, &scene.grid) {
            Some(next) => hit = next,
            None => {
                return PathSample {
                    color: throughput * background(&ray),
                    first_hit: Some(first_hit),
                };
            }
        }
    }
}

/// Averages `samples` independent paths. The G-buffer comes from the first one.
pub fn integrate_samples(
    primary: Ray,
    scene: &Scene,
    maximum_depth: u32,
    samples: u32,
    rng: &mut PixelRng,
) -> PathSample {
    let first = integrate(primary, scene, maximum_depth, rng);
    if samples <= 1 {
        return first;
    }

    let mut sum = first.color;
    for _ in 1..samples {
        sum += integrate(primary, scene, maximum_depth, rng).color;
    }

    PathSample {
        color: sum / samples as f32,
        first_hit: first.first_hit,
    }
}
