// src/app/camera.rs
use glam::{Mat4, Vec3};

use crate::app::input::InputState;
use crate::config;
use crate::render::CameraSnapshot;

pub struct Camera {
    pos: Vec3,
    yaw: f32,
    pitch: f32,
    fovy_rad: f32,
    z_near: f32,
    z_far: f32,
    // movement tuning
    speed: f32,
    mouse_sens: f32,
    sprint_mul: f32,
}

impl Camera {
    /// Starts outside the generated world, looking across it.
    pub fn new() -> Self {
        let extent = config::GRID_SIZE as f32 * config::VOXEL_SIZE;
        Self {
            pos: Vec3::new(extent * 0.5, extent * 0.9, extent * 1.3),
            yaw: std::f32::consts::PI,
            pitch: -0.45,
            fovy_rad: 60.0_f32.to_radians(),
            z_near: 0.1,
            z_far: 1000.0,
            speed: 12.0,
            mouse_sens: 0.0025,
            sprint_mul: 3.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn integrate_input(&mut self, input: &mut InputState, dt: f32) {
        // mouse look
        let (dx, dy) = input.take_mouse_delta();
        if input.focused {
            self.yaw -= dx * self.mouse_sens;
            self.pitch = (self.pitch - dy * self.mouse_sens).clamp(-1.55, 1.55);
        }

        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();

        let k = input.keys;
        let mut vel = Vec3::ZERO;
        if k.w { vel += forward; }
        if k.s { vel -= forward; }
        if k.d { vel += right; }
        if k.a { vel -= right; }
        if k.space { vel += up; }
        if k.alt { vel -= up; }

        if vel.length_squared() > 0.0 {
            let speed = if k.shift { self.speed * self.sprint_mul } else { self.speed };
            self.pos += vel.normalize() * (speed * dt);
        }
    }

    /// Matrices the renderer consumes this frame.
    pub fn snapshot(&self, aspect: f32) -> CameraSnapshot {
        let view = Mat4::look_at_rh(self.pos, self.pos + self.forward(), Vec3::Y);
        CameraSnapshot::new(view.inverse(), self.fovy_rad, aspect, self.z_near, self.z_far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
