//! Audio-driven sprite rotation shared by every bird.

use crate::config::FlockConfig;
use crate::easing::{approach_alpha, clamp01};

#[derive(Clone, Debug)]
pub struct AudioRotation {
    rms_amount: f32,
    crest_amount: f32,
    wobble_amount: f32,
    wobble_target: f32,
    wobble_dir: f32,
}

impl Default for AudioRotation {
    fn default() -> Self {
        Self {
            rms_amount: 0.0,
            crest_amount: 0.0,
            wobble_amount: 0.0,
            wobble_target: 0.0,
            wobble_dir: 1.0,
        }
    }
}

/// Linear map of `value` from the `[trigger, max]` band onto `[0, angle]`.
fn banded(value: f32, trigger: f32, max: f32, angle: f32) -> f32 {
    if value <= trigger {
        return 0.0;
    }
    angle * clamp01((value - trigger) / (max - trigger).max(1e-5))
}

impl AudioRotation {
    pub fn update(&mut self, cfg: &FlockConfig, rms: f32, crest: f32, dt: f32) {
        let rms_target = banded(
            rms,
            cfg.rms_rotate_trigger,
            cfg.rms_rotate_max,
            cfg.rms_rotate_max_angle,
        );
        let crest_target = banded(
            crest,
            cfg.crest_y_rotate_trigger,
            cfg.crest_y_rotate_max,
            cfg.crest_y_rotate_angle,
        );
        self.rms_amount +=
            (rms_target - self.rms_amount) * approach_alpha(cfg.rms_rotate_response, dt);
        self.crest_amount +=
            (crest_target - self.crest_amount) * approach_alpha(cfg.crest_y_rotate_response, dt);

        self.wobble_target -= self.wobble_target * approach_alpha(cfg.middle_peak_decay, dt);
        let wobble_alpha = approach_alpha(cfg.middle_peak_response, dt);
        self.wobble_amount += (self.wobble_target - self.wobble_amount) * wobble_alpha;
    }

    /// Nudge the wobble target the opposite way from last time, bounded.
    pub fn trigger_middle_peak(&mut self, cfg: &FlockConfig) {
        self.wobble_dir = -self.wobble_dir;
        self.wobble_target = (self.wobble_target + self.wobble_dir * cfg.middle_peak_step)
            .clamp(-cfg.middle_peak_max, cfg.middle_peak_max);
    }

    /// In-plane spin amplitude.
    pub fn spin(&self) -> f32 {
        self.rms_amount
    }

    /// Y rotation: crest response plus the middle-peak wobble.
    pub fn y_rotation(&self) -> f32 {
        self.crest_amount + self.wobble_amount
    }

    pub fn wobble_target(&self) -> f32 {
        self.wobble_target
    }
}
