//! The flock: per-particle state and the transform-mode state machine.
//!
//! All per-particle data lives in flat, index-aligned buffers allocated once
//! at construction. [`Flock::update`] is the only writer during a frame; the
//! renderer reads [`Flock::instances`] and [`Flock::line_segments`].

mod facing;
mod links;
mod overlay;
mod rotation;
mod scatter;
mod shapes;

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::atlas::AtlasRect;
use crate::camera::Camera;
use crate::config::FlockConfig;
use crate::easing::{approach_alpha, lerp};

pub use facing::{
    angular_distance, constrain_yaw_for_camera, shortest_angle_delta, side_flip_target,
    top_view_blend, top_view_pitch, FacingFlip,
};
pub use links::{pick_random_indices, Links};
pub use rotation::AudioRotation;
pub use shapes::{route_xz, shape_point, RouteShape, RouteSlot};

const ROUTE_TANGENT_STEP: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    World3d,
    To2d,
    Fly2d,
    Return2d,
    To3d,
    Scatter3d,
    Return3d,
}

impl TransformMode {
    pub fn name(self) -> &'static str {
        match self {
            TransformMode::World3d => "world3d",
            TransformMode::To2d => "to2d",
            TransformMode::Fly2d => "fly2d",
            TransformMode::Return2d => "return2d",
            TransformMode::To3d => "to3d",
            TransformMode::Scatter3d => "scatter3d",
            TransformMode::Return3d => "return3d",
        }
    }

    /// Modes where birds live in the screen-space overlay.
    pub fn is_overlay(self) -> bool {
        matches!(
            self,
            TransformMode::To2d | TransformMode::Fly2d | TransformMode::Return2d
        )
    }
}

/// Per-instance record uploaded to the sprite vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BirdInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub uv_rect: [f32; 4],
    pub tint: [f32; 3],
    pub side_flip: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_amp: f32,
    pub yaw_phase: f32,
    pub yaw_speed: f32,
    pub y_rot_mul: f32,
    pub _pad: [f32; 2],
}

/// Values shared by every sprite in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteGlobals {
    pub visual_scale: f32,
    pub facing_flip: f32,
    pub audio_spin: f32,
    pub y_rotation: f32,
}

pub struct Flock {
    cfg: FlockConfig,
    rng: StdRng,

    mode: TransformMode,
    timer: f32,
    reverse_fly: bool,
    shape: RouteShape,
    route_morph: f32,
    travel_direction: f32,
    visual_scale: f32,
    facing_flip: FacingFlip,
    rotation: AudioRotation,
    links: Links,

    // route state
    theta: Vec<f32>,
    speed: Vec<f32>,
    slots: Vec<RouteSlot>,
    ring: Vec<Vec3>,
    face_dir: Vec<Vec2>,
    pos: Vec<Vec3>,
    side_flip: Vec<f32>,

    // transition scratch
    world_start: Vec<Vec3>,
    screen_start: Vec<Vec2>,
    screen_target: Vec<Vec2>,
    screen_now: Vec<Vec2>,
    screen_vel: Vec<Vec2>,
    fly_origin: Vec<Vec2>,
    scatter_vel: Vec<Vec3>,

    tint: Vec<Vec3>,
    instances: Vec<BirdInstance>,
}

impl Flock {
    /// Spawn `cfg.count` birds, each assigned one of `rects` at random. An
    /// empty rect list maps every bird to the full texture.
    pub fn new(cfg: FlockConfig, rects: &[AtlasRect], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = cfg.count;
        let mut theta = Vec::with_capacity(n);
        let mut speed = Vec::with_capacity(n);
        let mut slots = Vec::with_capacity(n);
        let mut instances = Vec::with_capacity(n);

        for _ in 0..n {
            let rect = if rects.is_empty() {
                AtlasRect::FULL
            } else {
                rects[rng.gen_range(0..rects.len())]
            };
            let y_sign = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
            instances.push(BirdInstance {
                scale: cfg.sprite_size.lerp(rng.gen()),
                uv_rect: rect.to_array(),
                tint: [1.0; 3],
                side_flip: 1.0,
                yaw_amp: cfg.yaw_amplitude.lerp(rng.gen()),
                yaw_phase: rng.gen::<f32>() * TAU,
                yaw_speed: cfg.yaw_speed.lerp(rng.gen()),
                y_rot_mul: y_sign * cfg.y_rotation_multiplier.lerp(rng.gen()),
                ..BirdInstance::default()
            });
            theta.push(rng.gen::<f32>() * TAU);
            speed.push(cfg.speed.lerp(rng.gen()));
            slots.push(RouteSlot {
                y0: (rng.gen::<f32>() - 0.5) * cfg.height,
                flutter_phase: rng.gen::<f32>() * TAU,
                inner_ring: rng.gen::<f32>() < cfg.inner_ring_fraction,
                lane: rng.gen::<f32>() * 2.0 - 1.0,
            });
        }

        let ring: Vec<Vec3> = theta
            .iter()
            .zip(&slots)
            .map(|(&a, slot)| {
                let xz = route_xz(a, 0.0, cfg.radius);
                Vec3::new(xz.x, slot.y0, xz.y)
            })
            .collect();
        let face_dir = theta.iter().map(|&a| tangent(a, 1.0)).collect();

        let mut flock = Self {
            rng,
            mode: TransformMode::World3d,
            timer: 0.0,
            reverse_fly: false,
            shape: RouteShape::default(),
            route_morph: 0.0,
            travel_direction: 1.0,
            visual_scale: 1.0,
            facing_flip: FacingFlip::new(cfg.facing_flip_duration),
            rotation: AudioRotation::default(),
            links: Links::with_capacity(cfg.line_count()),
            theta,
            speed,
            slots,
            pos: ring.clone(),
            ring,
            face_dir,
            side_flip: vec![1.0; n],
            world_start: vec![Vec3::ZERO; n],
            screen_start: vec![Vec2::ZERO; n],
            screen_target: vec![Vec2::ZERO; n],
            screen_now: vec![Vec2::ZERO; n],
            screen_vel: vec![Vec2::ZERO; n],
            fly_origin: vec![Vec2::ZERO; n],
            scatter_vel: vec![Vec3::ZERO; n],
            tint: vec![Vec3::ONE; n],
            instances,
            cfg,
        };
        flock.randomize_connections();
        flock.links.update_segments(&flock.pos, &flock.ring);
        flock
    }

    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    pub fn config(&self) -> &FlockConfig {
        &self.cfg
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn route_shape(&self) -> RouteShape {
        self.shape
    }

    pub fn route_morph(&self) -> f32 {
        self.route_morph
    }

    pub fn travel_direction(&self) -> f32 {
        self.travel_direction
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.pos
    }

    pub fn ring_positions(&self) -> &[Vec3] {
        &self.ring
    }

    pub fn headings(&self) -> &[Vec2] {
        &self.face_dir
    }

    pub fn tints(&self) -> &[Vec3] {
        &self.tint
    }

    /// Mutable tints alongside read-only positions, for the colour subsystems.
    pub fn tints_and_positions(&mut self) -> (&mut [Vec3], &[Vec3]) {
        (&mut self.tint, &self.pos)
    }

    pub fn instances(&self) -> &[BirdInstance] {
        &self.instances
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn line_segments(&self) -> &[[Vec3; 2]] {
        self.links.segments()
    }

    pub fn rotation(&self) -> &AudioRotation {
        &self.rotation
    }

    pub fn globals(&self) -> SpriteGlobals {
        SpriteGlobals {
            visual_scale: self.visual_scale,
            facing_flip: self.facing_flip.value(),
            audio_spin: self.rotation.spin(),
            y_rotation: self.rotation.y_rotation(),
        }
    }

    pub fn cycle_route_shape(&mut self) -> RouteShape {
        self.shape = self.shape.next();
        log::debug!("[flock] route shape {}", self.shape.name());
        self.shape
    }

    /// Reverse travel direction and start the sprite mirror tween.
    pub fn toggle_direction(&mut self) -> f32 {
        self.travel_direction = -self.travel_direction;
        self.facing_flip.set_target(self.travel_direction);
        self.travel_direction
    }

    pub fn randomize_connections(&mut self) {
        let line_count = self.cfg.line_count();
        self.links.randomize(&mut self.rng, &self.theta, line_count);
    }

    pub fn update_audio_rotation(&mut self, rms: f32, crest: f32, dt: f32) {
        self.rotation.update(&self.cfg, rms, crest, dt);
    }

    pub fn trigger_middle_peak_wobble(&mut self) {
        self.rotation.trigger_middle_peak(&self.cfg);
    }

    fn set_mode(&mut self, mode: TransformMode) {
        if self.mode != mode {
            log::debug!("[flock] mode {} -> {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
        self.timer = 0.0;
    }

    fn snap_to_ring(&mut self) {
        self.pos.copy_from_slice(&self.ring);
    }

    /// Advance one frame. `t` is scene time in seconds.
    pub fn update(&mut self, dt: f32, t: f32, camera: &Camera) {
        let dt = dt.max(0.0);
        self.facing_flip.update(dt);

        let morph_target = self.shape.morph_target();
        self.route_morph +=
            (morph_target - self.route_morph) * approach_alpha(self.cfg.route_morph_response, dt);
        if (morph_target - self.route_morph).abs() < 1e-4 {
            self.route_morph = morph_target;
        }

        if self.mode != TransformMode::Scatter3d {
            self.advance_route(dt, t);
        }

        match self.mode {
            TransformMode::Scatter3d => {
                self.update_scatter(dt);
                self.visual_scale = 1.0;
            }
            TransformMode::Return3d => {
                self.update_return_from_scatter(dt);
                self.visual_scale = 1.0;
            }
            TransformMode::To2d => self.update_to_2d(dt, camera),
            TransformMode::Fly2d => {
                self.update_fly_2d(dt, camera);
                self.visual_scale = self.cfg.visual_scale_2d;
            }
            TransformMode::Return2d => {
                self.update_return_2d(dt, camera);
                self.visual_scale = self.cfg.visual_scale_2d;
            }
            TransformMode::To3d => self.update_to_3d(dt),
            TransformMode::World3d => {
                self.visual_scale = 1.0;
                self.snap_to_ring();
            }
        }

        self.orient(dt, camera);
        self.links.update_segments(&self.pos, &self.ring);
    }

    fn advance_route(&mut self, dt: f32, t: f32) {
        let dir = self.travel_direction;
        for i in 0..self.theta.len() {
            self.theta[i] += self.speed[i] * dt * dir;
            let angle = self.theta[i];
            let slot = self.slots[i];
            let target = shape_point(self.shape, &self.cfg, slot, angle, t, self.route_morph);
            let next = shape_point(
                self.shape,
                &self.cfg,
                slot,
                angle + ROUTE_TANGENT_STEP * dir,
                t,
                self.route_morph,
            );

            let to_target = target - self.ring[i];
            let dist = to_target.length();
            let orbit_speed = (self.cfg.radius * self.speed[i]).max(0.2);
            let max_step = orbit_speed * self.cfg.shape_transition_speed_factor * dt;
            if dist <= max_step.max(1e-5) {
                self.ring[i] = target;
            } else {
                self.ring[i] += to_target / dist * max_step;
            }

            let heading = if dist > max_step * 0.35 + 1e-5 {
                Vec2::new(to_target.x, to_target.z)
            } else {
                Vec2::new(next.x - target.x, next.z - target.z)
            };
            self.face_dir[i] = heading
                .try_normalize()
                .unwrap_or_else(|| tangent(angle, dir));
        }
    }

    /// Per-sprite mirror, yaw and pitch, written into the instance buffer.
    fn orient(&mut self, dt: f32, camera: &Camera) {
        let camera_right = camera.right_xz();
        let blend = top_view_blend(&self.cfg, camera.height_above_target());
        let use_heading_sign = matches!(
            self.mode,
            TransformMode::Scatter3d | TransformMode::Return3d
        );
        let flip_alpha = approach_alpha(self.cfg.side_flip_response, dt);

        for i in 0..self.theta.len() {
            let mut heading = self.face_dir[i];
            if heading.length() < 1e-5 {
                heading = tangent(self.theta[i], self.travel_direction);
            }
            let sign_basis = if use_heading_sign {
                heading
            } else {
                tangent(self.theta[i], 1.0)
            };
            let target = side_flip_target(
                self.side_flip[i],
                sign_basis,
                camera_right,
                self.cfg.side_flip_deadzone,
            );
            let current = self.side_flip[i];
            let flip = (current + (target - current) * flip_alpha).clamp(-1.0, 1.0);
            self.side_flip[i] = flip;

            let pos = self.pos[i];
            let move_yaw = heading.x.atan2(heading.y);
            let yaw =
                constrain_yaw_for_camera(move_yaw, pos, camera.eye, self.cfg.max_off_camera_yaw);
            let pitch = top_view_pitch(&self.cfg, pos, camera.eye, blend);

            let inst = &mut self.instances[i];
            inst.position = pos.to_array();
            inst.tint = self.tint[i].to_array();
            inst.side_flip = flip;
            inst.yaw = yaw;
            inst.pitch = pitch;
        }
    }

    fn overlay_depth_point(&self, screen: Vec2, camera: &Camera) -> Vec3 {
        let s = screen * self.cfg.screen_scale_factor;
        camera.unproject(Vec3::new(s.x, s.y, self.cfg.screen_depth_ndc))
    }

    fn random_screen_point(&mut self, margin_scale: f32) -> Vec2 {
        Vec2::new(
            (self.rng.gen::<f32>() * 2.0 - 1.0) * self.cfg.screen_margin_x * margin_scale,
            (self.rng.gen::<f32>() * 2.0 - 1.0) * self.cfg.screen_margin_y * margin_scale,
        )
    }

    fn ease_visual_scale(&mut self, from: f32, to: f32, k: f32) {
        self.visual_scale = lerp(from, to, k);
    }
}

/// Unit tangent of the base circle at `angle` in travel direction `dir`.
fn tangent(angle: f32, dir: f32) -> Vec2 {
    Vec2::new(-angle.sin() * dir, angle.cos() * dir)
}
