//! Scatter flight and the homing return to the route.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{tangent, Flock, TransformMode};
use crate::easing::clamp01;

impl Flock {
    /// world3d/to3d -> scatter3d, scatter3d -> return3d, return3d -> scatter3d.
    /// Ignored while the overlay owns the birds.
    pub fn toggle_scatter(&mut self) -> TransformMode {
        match self.mode {
            TransformMode::Scatter3d => self.set_mode(TransformMode::Return3d),
            TransformMode::World3d | TransformMode::To3d | TransformMode::Return3d => {
                self.begin_scatter()
            }
            TransformMode::To2d | TransformMode::Fly2d | TransformMode::Return2d => {
                log::debug!("[flock] scatter toggle ignored in {}", self.mode.name());
            }
        }
        self.mode
    }

    fn begin_scatter(&mut self) {
        self.set_mode(TransformMode::Scatter3d);
        self.reverse_fly = false;
        self.visual_scale = 1.0;
        for i in 0..self.len() {
            let angle = self.rng.gen::<f32>() * TAU;
            let speed = self.cfg.scatter_speed.lerp(self.rng.gen());
            let dir = Vec2::from_angle(angle);
            self.scatter_vel[i] = Vec3::new(dir.x, 0.0, dir.y) * speed;
            self.face_dir[i] = dir;
        }
    }

    pub(super) fn update_scatter(&mut self, dt: f32) {
        let accel = 1.0 + self.cfg.scatter_accel * dt;
        for i in 0..self.len() {
            self.pos[i] += self.scatter_vel[i] * dt;
            self.scatter_vel[i] *= accel;
            self.face_dir[i] = Vec2::new(self.scatter_vel[i].x, self.scatter_vel[i].z);
        }
    }

    /// Home every bird on its (still moving) ring slot. The mode only flips
    /// back to world3d once all of them have snapped.
    pub(super) fn update_return_from_scatter(&mut self, dt: f32) {
        let mut all_arrived = true;
        let dist_norm = (self.cfg.radius * 4.0).max(1e-5);

        for i in 0..self.len() {
            let to_ring = self.ring[i] - self.pos[i];
            let dist = to_ring.length();
            if dist > self.cfg.return_snap_distance {
                all_arrived = false;
                let speed = self.cfg.return_speed.lerp(clamp01(dist / dist_norm));
                let step = dist.min(speed * dt);
                self.pos[i] += to_ring / dist.max(1e-5) * step;
                self.face_dir[i] = Vec2::new(to_ring.x, to_ring.z);
            } else {
                self.pos[i] = self.ring[i];
                self.face_dir[i] = tangent(self.theta[i], self.travel_direction);
            }
        }

        if all_arrived {
            self.set_mode(TransformMode::World3d);
            self.snap_to_ring();
        }
    }
}
