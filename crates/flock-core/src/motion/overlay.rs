//! Screen-space overlay: flying the flock out of the world and back.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Flock, TransformMode};
use crate::camera::Camera;
use crate::easing::{clamp01, ease_in_out_cubic, ease_out_back};

const FLY_ANGLE_JITTER: f32 = 0.45;
const TO_2D_MARGIN: f32 = 0.95;
const RETURN_2D_MARGIN: f32 = 0.62;

impl Flock {
    /// World <-> overlay toggle. Ignored while scattered.
    pub fn toggle_2d_mode(&mut self, camera: &Camera) -> TransformMode {
        match self.mode {
            TransformMode::World3d | TransformMode::To3d => self.begin_to_2d(camera),
            TransformMode::To2d | TransformMode::Fly2d | TransformMode::Return2d => {
                self.begin_return_2d(camera)
            }
            TransformMode::Scatter3d | TransformMode::Return3d => {
                log::debug!("[flock] overlay toggle ignored in {}", self.mode.name());
            }
        }
        self.mode
    }

    fn begin_to_2d(&mut self, camera: &Camera) {
        self.set_mode(TransformMode::To2d);
        self.reverse_fly = false;
        for i in 0..self.len() {
            self.world_start[i] = self.pos[i];
            let ndc = camera.project(self.pos[i]).truncate();
            self.screen_start[i] = ndc;
            self.screen_now[i] = ndc;
            self.screen_target[i] = self.random_screen_point(TO_2D_MARGIN);
        }
    }

    fn begin_return_2d(&mut self, camera: &Camera) {
        let reverse = self.mode == TransformMode::Fly2d;
        self.set_mode(TransformMode::Return2d);
        self.reverse_fly = reverse;
        for i in 0..self.len() {
            let ndc = camera.project(self.pos[i]).truncate();
            self.screen_start[i] = ndc;
            self.screen_now[i] = ndc;
            self.screen_target[i] = if reverse {
                self.fly_origin[i]
            } else {
                self.random_screen_point(RETURN_2D_MARGIN)
            };
        }
    }

    pub(super) fn update_to_2d(&mut self, dt: f32, camera: &Camera) {
        self.timer += dt;
        let u = clamp01(self.timer / self.cfg.transition_duration.max(1e-5));
        let k = ease_in_out_cubic(u);
        self.ease_visual_scale(1.0, self.cfg.visual_scale_2d, k);

        for i in 0..self.len() {
            self.screen_now[i] = self.screen_start[i].lerp(self.screen_target[i], k);
            let dest = self.overlay_depth_point(self.screen_now[i], camera);
            self.pos[i] = self.world_start[i].lerp(dest, k);
        }

        if u >= 1.0 {
            self.set_mode(TransformMode::Fly2d);
            self.reverse_fly = false;
            for i in 0..self.len() {
                let origin = self.screen_now[i];
                self.fly_origin[i] = origin;
                let mut angle = origin.y.atan2(origin.x);
                if !angle.is_finite() {
                    angle = self.rng.gen::<f32>() * TAU;
                }
                angle += self.rng.gen_range(-FLY_ANGLE_JITTER..=FLY_ANGLE_JITTER);
                let speed = self.cfg.fly_speed_2d.lerp(self.rng.gen());
                self.screen_vel[i] = Vec2::from_angle(angle) * speed;
            }
        }
    }

    pub(super) fn update_fly_2d(&mut self, dt: f32, camera: &Camera) {
        for i in 0..self.len() {
            self.screen_now[i] += self.screen_vel[i] * dt;
            self.pos[i] = self.overlay_depth_point(self.screen_now[i], camera);
        }
    }

    pub(super) fn update_return_2d(&mut self, dt: f32, camera: &Camera) {
        if !self.reverse_fly {
            self.timer += dt;
        }
        let u = clamp01(self.timer / self.cfg.return_2d_duration.max(1e-5));
        let k = ease_out_back(u);
        let mut finished = true;

        for i in 0..self.len() {
            if self.reverse_fly {
                let to_target = self.screen_target[i] - self.screen_now[i];
                let dist = to_target.length();
                let step = self.screen_vel[i].length() * dt;
                if dist <= step.max(1e-5) {
                    self.screen_now[i] = self.screen_target[i];
                } else {
                    self.screen_now[i] += to_target / dist * step;
                    finished = false;
                }
            } else {
                self.screen_now[i] = self.screen_start[i].lerp(self.screen_target[i], k);
            }
            self.pos[i] = self.overlay_depth_point(self.screen_now[i], camera);
        }

        let done = if self.reverse_fly { finished } else { u >= 1.0 };
        if done {
            self.set_mode(TransformMode::To3d);
            self.reverse_fly = false;
            self.world_start.copy_from_slice(&self.pos);
        }
    }

    pub(super) fn update_to_3d(&mut self, dt: f32) {
        self.timer += dt;
        let u = clamp01(self.timer / self.cfg.return_3d_duration.max(1e-5));
        let k = ease_in_out_cubic(u);
        self.ease_visual_scale(self.cfg.visual_scale_2d, 1.0, k);
        for i in 0..self.len() {
            self.pos[i] = self.world_start[i].lerp(self.ring[i], k);
        }
        if u >= 1.0 {
            self.set_mode(TransformMode::World3d);
            self.snap_to_ring();
        }
    }
}
