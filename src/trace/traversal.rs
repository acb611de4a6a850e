// src/trace/traversal.rs
//
// Grid DDA after Amanatides & Woo, "A Fast Voxel Traversal Algorithm for Ray
// Tracing" (1987). Steps one cell boundary at a time and stops at the first
// non-air cell, or after a fixed number of steps.

use glam::{IVec3, Vec3};

use crate::config::{HIT_EPSILON, MAXIMUM_TRAVERSAL_DISTANCE};
use crate::trace::ray::Ray;
use crate::world::grid::{VoxelGrid, AIR};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub t: f32,
    pub position: Vec3,
    /// Outward face normal, always ±X, ±Y or ±Z.
    pub normal: Vec3,
    pub material_id: u8,
    /// Grid coordinate of the entered cell along the crossed axis. Only the
    /// primary bounce consumes it.
    pub offset_id: i32,
}

#[inline]
pub fn traverse(ray: &Ray, grid: &VoxelGrid) -> Option<HitRecord> {
    traverse_with_limit(ray, grid, MAXIMUM_TRAVERSAL_DISTANCE)
}

pub fn traverse_with_limit(ray: &Ray, grid: &VoxelGrid, max_steps: u32) -> Option<HitRecord> {
    let voxel_size = grid.voxel_size();
    let origin = ray.origin;
    let direction = ray.direction;

    let mut voxel: IVec3 = (origin / voxel_size).floor().as_ivec3();

    let step = IVec3::new(
        if direction.x > 0.0 { 1 } else { -1 },
        if direction.y > 0.0 { 1 } else { -1 },
        if direction.z > 0.0 { 1 } else { -1 },
    );

    // Parametric distance to the first boundary on each axis, and between boundaries.
    let mut t_max = Vec3::splat(f32::INFINITY);
    let mut t_delta = Vec3::splat(f32::INFINITY);
    for axis in 0..3 {
        if direction[axis] == 0.0 {
            continue;
        }
        let cell = if step[axis] > 0 { voxel[axis] + 1 } else { voxel[axis] };
        let next_boundary = cell as f32 * voxel_size;
        t_max[axis] = (next_boundary - origin[axis]) / direction[axis];
        t_delta[axis] = voxel_size / direction[axis] * step[axis] as f32;
    }

    for _ in 0..max_steps {
        // Ties fall through to the later axis.
        let axis = if t_max.x < t_max.y && t_max.x < t_max.z {
            0
        } else if t_max.y < t_max.z {
            1
        } else {
            2
        };

        let t = t_max[axis];
        t_max[axis] += t_delta[axis];
        voxel[axis] += step[axis];

        let material_id = grid.get(voxel);
        if material_id != AIR {
            let mut normal = Vec3::ZERO;
            normal[axis] = -step[axis] as f32;

            return Some(HitRecord {
                t,
                position: ray.point_at(t + HIT_EPSILON),
                normal,
                material_id,
                offset_id: voxel[axis],
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[(IVec3, u8)]) -> VoxelGrid {
        let mut g = VoxelGrid::new(4, 1.0);
        for &(c, id) in cells {
            g.set(c, id);
        }
        g
    }

    #[test]
    fn axis_aligned_hit_is_exact() {
        let g = grid_with(&[(IVec3::new(2, 0, 0), 1)]);
        let ray = Ray::new(Vec3::splat(0.5), Vec3::X);

        let hit = traverse(&ray, &g).expect("ray should hit cell (2,0,0)");
        assert_eq!(hit.t, 1.5);
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert_eq!(hit.material_id, 1);
        assert_eq!(hit.offset_id, 2);
        assert!((hit.position - Vec3::new(2.0, 0.5, 0.5)).length() < 1e-3);
        // The epsilon pushes the point into the entered cell.
        assert!(hit.position.x >= 2.0);
    }

    #[test]
    fn negative_direction_reports_positive_normal() {
        let g = grid_with(&[(IVec3::new(0, 1, 3), 2)]);
        let ray = Ray::new(Vec3::new(0.5, 3.5, 3.5), Vec3::NEG_Y);

        let hit = traverse(&ray, &g).unwrap();
        assert_eq!(hit.normal, Vec3::Y);
        assert_eq!(hit.t, 1.5);
        assert_eq!(hit.offset_id, 1);
        assert_eq!(hit.material_id, 2);
    }

    #[test]
    fn ray_pointing_away_misses_within_bound() {
        let g = grid_with(&[(IVec3::new(3, 3, 3), 1)]);
        let ray = Ray::new(Vec3::splat(1.5), Vec3::new(-1.0, -0.3, -0.7));
        assert!(traverse(&ray, &g).is_none());
    }

    #[test]
    fn step_limit_turns_distant_hits_into_misses() {
        let g = grid_with(&[(IVec3::new(3, 0, 0), 1)]);
        let ray = Ray::new(Vec3::splat(0.5), Vec3::X);
        assert!(traverse_with_limit(&ray, &g, 2).is_none());
        assert!(traverse_with_limit(&ray, &g, 3).is_some());
    }

    #[test]
    fn zero_direction_components_are_never_stepped() {
        let g = grid_with(&[(IVec3::new(1, 3, 1), 4)]);
        // Starts exactly on boundaries in x and z.
        let ray = Ray::new(Vec3::new(1.0, 0.5, 1.0), Vec3::new(0.0, 1.0, 0.0));
        let hit = traverse(&ray, &g).unwrap();
        assert_eq!(hit.normal, Vec3::NEG_Y);
        assert_eq!(hit.t, 2.5);
        assert!(hit.t.is_finite());
    }

    #[test]
    fn all_zero_direction_terminates() {
        let g = grid_with(&[]);
        let ray = Ray::new(Vec3::splat(0.5), Vec3::ZERO);
        assert!(traverse(&ray, &g).is_none());
    }

    #[test]
    fn diagonal_tie_prefers_later_axis() {
        // x and y boundaries coincide at t = 0.5; the tie resolves to y.
        let g = grid_with(&[(IVec3::new(0, 1, 0), 1), (IVec3::new(1, 0, 0), 2)]);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 0.0));
        let hit = traverse(&ray, &g).unwrap();
        assert_eq!(hit.material_id, 1);
        assert_eq!(hit.normal, Vec3::NEG_Y);
    }

    #[test]
    fn origin_outside_grid_still_traverses() {
        let g = grid_with(&[(IVec3::new(0, 0, 0), 3)]);
        let ray = Ray::new(Vec3::new(-5.5, 0.5, 0.5), Vec3::X);
        let hit = traverse(&ray, &g).unwrap();
        assert_eq!(hit.t, 5.5);
        assert_eq!(hit.offset_id, 0);
    }
}
