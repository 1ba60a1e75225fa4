//! Sprite orientation: keeping birds readable from the camera.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::config::FlockConfig;
use crate::easing::{clamp01, ease_in_out_cubic};

/// Signed difference `to - from` wrapped into (-PI, PI].
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    let mut delta = (to - from + PI) % TAU;
    if delta < 0.0 {
        delta += TAU;
    }
    delta - PI
}

/// Clamp a movement yaw so it stays within `max_off` of the yaw pointing from
/// `position` to the camera eye.
pub fn constrain_yaw_for_camera(move_yaw: f32, position: Vec3, eye: Vec3, max_off: f32) -> f32 {
    let to_cam = Vec2::new(eye.x - position.x, eye.z - position.z);
    if to_cam.length_squared() < 1e-10 {
        return move_yaw;
    }
    let cam_yaw = to_cam.x.atan2(to_cam.y);
    let delta = shortest_angle_delta(cam_yaw, move_yaw).clamp(-max_off, max_off);
    cam_yaw + delta
}

/// How far the camera has climbed into the top-down blend band, 0..1.
pub fn top_view_blend(cfg: &FlockConfig, height_above_target: f32) -> f32 {
    let span = (cfg.top_view_blend_end - cfg.top_view_blend_start).max(1e-5);
    clamp01((height_above_target - cfg.top_view_blend_start) / span)
}

/// Pitch tilting a sprite back toward a camera above it.
pub fn top_view_pitch(cfg: &FlockConfig, position: Vec3, eye: Vec3, blend: f32) -> f32 {
    if blend <= 0.0 {
        return 0.0;
    }
    let to_cam = eye - position;
    let horiz = Vec2::new(to_cam.x, to_cam.z).length();
    let elevation = to_cam.y.atan2(horiz).max(0.0);
    -(elevation * cfg.top_view_pitch_strength * blend).min(cfg.top_view_max_pitch)
}

/// Mirror sign for one sprite: -1 when the camera-right component of its
/// heading is clearly positive, +1 when clearly negative, unchanged inside the
/// deadzone.
pub fn side_flip_target(current: f32, heading: Vec2, camera_right: Vec2, deadzone: f32) -> f32 {
    let side = heading.dot(camera_right);
    if side.abs() >= deadzone {
        if side >= 0.0 {
            -1.0
        } else {
            1.0
        }
    } else if current >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Tween of the global mirror applied when travel direction reverses.
#[derive(Clone, Copy, Debug)]
pub struct FacingFlip {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    value: f32,
}

impl FacingFlip {
    pub fn new(duration: f32) -> Self {
        Self {
            from: 1.0,
            to: 1.0,
            elapsed: duration,
            duration,
            value: 1.0,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        if target == self.to {
            return;
        }
        self.from = self.value;
        self.to = target;
        self.elapsed = 0.0;
    }

    pub fn update(&mut self, dt: f32) -> f32 {
        if self.elapsed < self.duration {
            self.elapsed += dt.max(0.0);
            let t = clamp01(self.elapsed / self.duration.max(1e-5));
            self.value = self.from + (self.to - self.from) * ease_in_out_cubic(t);
        } else {
            self.value = self.to;
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Unsigned angle between two headings, in [0, PI].
pub fn angular_distance(a: f32, b: f32) -> f32 {
    shortest_angle_delta(a, b).abs()
}
