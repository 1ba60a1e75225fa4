//! Tunable parameters for the flock, its reactions and its overlays.
//!
//! `FlockConfig::default()` carries the shipped tuning. Angles are radians,
//! durations seconds, distances world units unless noted otherwise.

use std::f32::consts::PI;

use crate::error::{FlockError, Result};

/// Inclusive `[min, max]` range sampled uniformly per particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlockConfig {
    pub count: usize,
    pub radius: f32,
    pub height: f32,
    pub speed: Span,
    pub sprite_size: Span,
    pub flutter: f32,
    pub flutter_speed: f32,

    // sprite sway and orientation
    pub yaw_amplitude: Span,
    pub yaw_speed: Span,
    pub y_rotation_multiplier: Span,
    pub max_off_camera_yaw: f32,
    pub side_flip_response: f32,
    pub side_flip_deadzone: f32,
    pub top_view_blend_start: f32,
    pub top_view_blend_end: f32,
    pub top_view_pitch_strength: f32,
    pub top_view_max_pitch: f32,
    pub facing_flip_duration: f32,

    // audio driven rotation
    pub rms_rotate_trigger: f32,
    pub rms_rotate_max: f32,
    pub rms_rotate_max_angle: f32,
    pub rms_rotate_response: f32,
    pub crest_y_rotate_trigger: f32,
    pub crest_y_rotate_max: f32,
    pub crest_y_rotate_angle: f32,
    pub crest_y_rotate_response: f32,
    pub middle_peak_step: f32,
    pub middle_peak_max: f32,
    pub middle_peak_response: f32,
    pub middle_peak_decay: f32,

    // route shapes
    pub shape_transition_speed_factor: f32,
    pub inner_ring_fraction: f32,
    pub inner_ring_radius_factor: f32,
    pub inner_ring_height_factor: f32,
    pub inner_ring_angular_rate: f32,
    pub mobius_radius_factor: f32,
    pub mobius_half_width: f32,
    pub mobius_flutter_mix: f32,
    pub mobius_angular_rate: f32,
    pub route_morph_response: f32,

    // scatter
    pub scatter_speed: Span,
    pub scatter_accel: f32,
    pub return_speed: Span,
    pub return_snap_distance: f32,

    pub line_fraction: f32,

    // 2D overlay
    pub transition_duration: f32,
    pub return_2d_duration: f32,
    pub return_3d_duration: f32,
    pub fly_speed_2d: Span,
    pub screen_margin_x: f32,
    pub screen_margin_y: f32,
    pub screen_depth_ndc: f32, // [0, 1] clip depth at which overlay sprites sit
    pub screen_scale_factor: f32,
    pub visual_scale_2d: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            count: 900,
            radius: 12.0,
            height: 14.0,
            speed: Span::new(0.08, 0.35),
            sprite_size: Span::new(0.18, 0.55),
            flutter: 0.35,
            flutter_speed: 0.6,

            yaw_amplitude: Span::new(PI / 18.0, PI / 12.0),
            yaw_speed: Span::new(2.0, 3.4),
            y_rotation_multiplier: Span::new(0.6, 1.0),
            max_off_camera_yaw: PI / 4.0,
            side_flip_response: 7.0,
            side_flip_deadzone: 0.06,
            top_view_blend_start: 12.0,
            top_view_blend_end: 34.0,
            top_view_pitch_strength: 0.9,
            top_view_max_pitch: PI / 3.0,
            facing_flip_duration: 0.32,

            rms_rotate_trigger: 0.4,
            rms_rotate_max: 0.75,
            rms_rotate_max_angle: PI / 7.5,
            rms_rotate_response: 7.5,
            crest_y_rotate_trigger: 2.0,
            crest_y_rotate_max: 4.0,
            crest_y_rotate_angle: PI / 40.0,
            crest_y_rotate_response: 6.5,
            middle_peak_step: PI / 48.0,
            middle_peak_max: PI / 16.0,
            middle_peak_response: 8.5,
            middle_peak_decay: 3.6,

            shape_transition_speed_factor: 2.0,
            inner_ring_fraction: 0.36,
            inner_ring_radius_factor: 0.45,
            inner_ring_height_factor: 0.8,
            inner_ring_angular_rate: 1.0,
            mobius_radius_factor: 0.74,
            mobius_half_width: 2.5,
            mobius_flutter_mix: 0.24,
            mobius_angular_rate: 1.0,
            route_morph_response: 2.8,

            scatter_speed: Span::new(6.2, 10.8),
            scatter_accel: 0.0,
            return_speed: Span::new(16.0, 28.0),
            return_snap_distance: 0.08,

            line_fraction: 0.25,

            transition_duration: 0.9,
            return_2d_duration: 0.7,
            return_3d_duration: 0.9,
            fly_speed_2d: Span::new(0.55, 1.2),
            screen_margin_x: 0.7,
            screen_margin_y: 0.52,
            screen_depth_ndc: 0.575,
            screen_scale_factor: 0.32,
            visual_scale_2d: 0.0267,
        }
    }
}

impl FlockConfig {
    /// Reject configurations the motion code cannot run with.
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            self.speed,
            self.sprite_size,
            self.yaw_amplitude,
            self.yaw_speed,
            self.y_rotation_multiplier,
            self.scatter_speed,
            self.return_speed,
            self.fly_speed_2d,
        ];
        if ranges.iter().any(|r| !r.is_ordered()) {
            return Err(FlockError::InvalidConfig("range min exceeds max"));
        }
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return Err(FlockError::InvalidConfig("radius must be positive"));
        }
        if self.rms_rotate_max <= self.rms_rotate_trigger
            || self.crest_y_rotate_max <= self.crest_y_rotate_trigger
        {
            return Err(FlockError::InvalidConfig("rotation trigger band is empty"));
        }
        if self.top_view_blend_end <= self.top_view_blend_start {
            return Err(FlockError::InvalidConfig("top view blend band is empty"));
        }
        if !(0.0..=1.0).contains(&self.inner_ring_fraction)
            || !(0.0..=1.0).contains(&self.line_fraction)
        {
            return Err(FlockError::InvalidConfig("fractions must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Number of connector lines drawn between particle pairs.
    pub fn line_count(&self) -> usize {
        let from_fraction = (self.count as f32 * self.line_fraction * 0.5).floor() as usize;
        from_fraction.min(self.count / 2)
    }
}

/// Band-pass detector thresholds. Frequencies in Hz.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerConfig {
    pub direction_hz: f32,
    pub direction_tolerance_hz: f32,
    pub descending_hz: f32,
    pub descending_tolerance_hz: f32,
    pub sub_threshold: f32,
    pub middle_peak_hz: f32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            direction_hz: 1336.0,
            direction_tolerance_hz: 7.0,
            descending_hz: 47.0,
            descending_tolerance_hz: 4.0,
            sub_threshold: 0.04,
            middle_peak_hz: 270.0,
        }
    }
}

