//! Camera description, projection helpers and the preset rig.
//!
//! These types avoid platform APIs. The web frontend builds its uniform
//! matrices from [`Camera`]; the motion code uses the same camera to map
//! particles into and out of screen space for the 2D overlay.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::*;
use crate::easing::{clamp01, ease_in_out_cubic, lerp};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: camera_start_vec3(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World position to normalized device coordinates (depth in [0, 1]).
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// Normalized device coordinates back to a world position.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Camera right vector flattened onto the ground plane, falls back to +X
    /// when looking straight down.
    pub fn right_xz(&self) -> Vec2 {
        let forward = self.target - self.eye;
        let right = forward.cross(self.up);
        Vec2::new(right.x, right.z).try_normalize().unwrap_or(Vec2::X)
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Height of the eye above its target, used to blend in top-down pitch.
    pub fn height_above_target(&self) -> f32 {
        self.eye.y - self.target.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPreset {
    BirdsEye,
    OuterMiddle,
    LowGlide,
    HighWide,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 4] = [
        CameraPreset::BirdsEye,
        CameraPreset::OuterMiddle,
        CameraPreset::LowGlide,
        CameraPreset::HighWide,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CameraPreset::BirdsEye => "birds-eye",
            CameraPreset::OuterMiddle => "outer-middle",
            CameraPreset::LowGlide => "low-glide",
            CameraPreset::HighWide => "high-wide",
        }
    }

    pub fn duration(self) -> f32 {
        match self {
            CameraPreset::BirdsEye => 1.8,
            CameraPreset::OuterMiddle => 1.45,
            CameraPreset::LowGlide => 1.5,
            CameraPreset::HighWide => 1.6,
        }
    }

    /// Destination `(eye, target)` given the pose the tween starts from.
    pub fn pose_from(self, camera: &Camera) -> (Vec3, Vec3) {
        match self {
            CameraPreset::BirdsEye => {
                // keep the current azimuth so the top-down view does not spin
                let offset = camera.eye - camera.target;
                let dir = Vec2::new(offset.x, offset.z)
                    .try_normalize()
                    .unwrap_or(Vec2::X);
                (Vec3::new(dir.x * 1.0, 44.0, dir.y * 1.0), Vec3::ZERO)
            }
            CameraPreset::OuterMiddle => (Vec3::new(29.0, 0.8, 0.0), Vec3::ZERO),
            CameraPreset::LowGlide => (Vec3::new(-23.0, 4.5, 10.0), Vec3::new(0.0, 0.5, 0.0)),
            CameraPreset::HighWide => (Vec3::new(-10.0, 20.0, -26.0), Vec3::new(0.0, 1.2, 0.0)),
        }
    }
}

#[derive(Clone, Debug)]
struct RigTween {
    from_eye: Vec3,
    from_target: Vec3,
    to_eye: Vec3,
    to_target: Vec3,
    elapsed: f32,
    duration: f32,
}

/// Cycles camera presets and tweens the camera between them.
#[derive(Clone, Debug, Default)]
pub struct CameraRig {
    next: usize,
    current: Option<CameraPreset>,
    tween: Option<RigTween>,
}

impl CameraRig {
    /// Start a tween toward the next preset in the cycle.
    pub fn cycle(&mut self, camera: &Camera) -> CameraPreset {
        let preset = CameraPreset::ALL[self.next % CameraPreset::ALL.len()];
        self.next = (self.next + 1) % CameraPreset::ALL.len();
        let (to_eye, to_target) = preset.pose_from(camera);
        self.tween = Some(RigTween {
            from_eye: camera.eye,
            from_target: camera.target,
            to_eye,
            to_target,
            elapsed: 0.0,
            duration: preset.duration(),
        });
        self.current = Some(preset);
        log::debug!("[camera] preset {}", preset.name());
        preset
    }

    pub fn current(&self) -> Option<CameraPreset> {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.tween.is_some()
    }

    /// Advance the tween and write the pose into `camera`. Returns whether the
    /// rig drove the camera this frame.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        tween.elapsed += dt.max(0.0);
        let t = clamp01(tween.elapsed / tween.duration.max(1e-5));
        let k = ease_in_out_cubic(t);
        camera.eye = tween.from_eye.lerp(tween.to_eye, k);
        camera.target = tween.from_target.lerp(tween.to_target, k);
        if t >= 1.0 {
            self.tween = None;
        }
        true
    }
}

/// Volume for the ambient flight loop. Louder as the camera closes in on its
/// target.
#[derive(Clone, Copy, Debug)]
pub struct AmbientVolume {
    current: f32,
}

impl Default for AmbientVolume {
    fn default() -> Self {
        Self {
            current: AMBIENT_VOLUME_MAX,
        }
    }
}

impl AmbientVolume {
    pub fn target_for_distance(distance: f32) -> f32 {
        let span = (CAMERA_MAX_DISTANCE - CAMERA_MIN_DISTANCE).max(1e-5);
        let near = clamp01((CAMERA_MAX_DISTANCE - distance) / span);
        lerp(AMBIENT_VOLUME_MIN, AMBIENT_VOLUME_MAX, near)
    }

    pub fn update(&mut self, distance: f32) -> f32 {
        let target = Self::target_for_distance(distance);
        self.current += (target - self.current) * AMBIENT_VOLUME_LERP;
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }
}
