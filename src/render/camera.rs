// src/render/camera.rs
//
// Read-only per-frame camera snapshot handed to the renderer.

use glam::{Mat4, Vec3, Vec4Swizzles};

use crate::trace::Ray;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub inverse_projection: Mat4,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub aspect: f32,
}

impl CameraSnapshot {
    pub fn new(world: Mat4, fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        let projection = Mat4::perspective_rh(fov_y, aspect, z_near, z_far);
        Self {
            world,
            view: world.inverse(),
            projection,
            inverse_projection: projection.inverse(),
            fov_y,
            aspect,
        }
    }

    /// Camera looking from `eye` towards `target`, +Y up.
    pub fn look_at(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        Self::new(view.inverse(), fov_y, aspect, 0.1, 1000.0)
    }

    pub fn origin(&self) -> Vec3 {
        self.world.w_axis.xyz()
    }

    /// Ray through the centre of pixel (x, y); row 0 is the top of the image.
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let ndc_x = ((x as f32 + 0.5) / width as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - ((y as f32 + 0.5) / height as f32) * 2.0;

        let scale = (self.fov_y * 0.5).tan();
        let local = Vec3::new(ndc_x * self.aspect * scale, ndc_y * scale, -1.0);
        let direction = self.world.transform_vector3(local).normalize();

        Ray::new(self.origin(), direction)
    }
}

/// Camera state remembered alongside a history slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMatrices {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl From<&CameraSnapshot> for CameraMatrices {
    fn from(c: &CameraSnapshot) -> Self {
        Self {
            world: c.world,
            view: c.view,
            projection: c.projection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_ray_follows_view_direction() {
        let cam = CameraSnapshot::look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), 1.0, 1.0);
        let r = cam.primary_ray(50, 50, 101, 101);
        assert!((r.direction - Vec3::NEG_Z).length() < 1e-5);
        assert!(r.origin.length() < 1e-6);
    }

    #[test]
    fn top_row_looks_up() {
        let cam = CameraSnapshot::look_at(Vec3::ZERO, Vec3::NEG_Z, 1.0, 1.0);
        assert!(cam.primary_ray(5, 0, 10, 10).direction.y > 0.0);
        assert!(cam.primary_ray(5, 9, 10, 10).direction.y < 0.0);
        assert!(cam.primary_ray(0, 5, 10, 10).direction.x < 0.0);
    }

    #[test]
    fn primary_rays_project_back_onto_their_pixel() {
        let cam = CameraSnapshot::look_at(Vec3::new(3.0, 4.0, 9.0), Vec3::new(1.0, 0.5, 0.0), 1.1, 1.5);
        let (w, h) = (30, 20);
        for &(x, y) in &[(0, 0), (29, 19), (7, 13), (15, 10)] {
            let r = cam.primary_ray(x, y, w, h);
            let p = r.point_at(6.0);
            let clip = cam.projection * cam.view * p.extend(1.0);
            let ndc = clip.xyz() / clip.w;
            let px = ((ndc.x * 0.5 + 0.5) * w as f32).floor() as u32;
            let py = ((0.5 - ndc.y * 0.5) * h as f32).floor() as u32;
            assert_eq!((px, py), (x, y));
        }
    }
}
