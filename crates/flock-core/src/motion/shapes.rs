//! Route shapes the flock follows while in world space.

use glam::{Vec2, Vec3};

use crate::config::FlockConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RouteShape {
    #[default]
    Cylinder,
    DoubleCylinder,
    Mobius,
    Cube,
}

impl RouteShape {
    pub const CYCLE: [RouteShape; 4] = [
        RouteShape::Cylinder,
        RouteShape::DoubleCylinder,
        RouteShape::Mobius,
        RouteShape::Cube,
    ];

    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|&s| s == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            RouteShape::Cylinder => "cylinder",
            RouteShape::DoubleCylinder => "double-cylinder",
            RouteShape::Mobius => "mobius",
            RouteShape::Cube => "cube",
        }
    }

    /// Target value of the circle-to-square morph for this shape.
    pub fn morph_target(self) -> f32 {
        if self == RouteShape::Cube {
            1.0
        } else {
            0.0
        }
    }
}

/// Per-particle route parameters fixed at spawn.
#[derive(Clone, Copy, Debug)]
pub struct RouteSlot {
    pub y0: f32,
    pub flutter_phase: f32,
    pub inner_ring: bool,
    pub lane: f32, // [-1, 1] across the Möbius strip
}

/// Point on the circle/square blend at `angle`. `morph` 0 is a circle of
/// `radius`, 1 is the square inscribing it.
pub fn route_xz(angle: f32, morph: f32, radius: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    let circle = Vec2::new(c, s);
    let max_abs = c.abs().max(s.abs()).max(1e-6);
    let square = circle / max_abs;
    circle.lerp(square, morph) * radius
}

/// World-space target for a particle sitting at `angle` on `shape`.
pub fn shape_point(
    shape: RouteShape,
    cfg: &FlockConfig,
    slot: RouteSlot,
    angle: f32,
    time: f32,
    morph: f32,
) -> Vec3 {
    let flutter_y = slot.y0 + (time * cfg.flutter_speed + slot.flutter_phase).sin() * cfg.flutter;
    match shape {
        RouteShape::DoubleCylinder if slot.inner_ring => {
            let a = angle * cfg.inner_ring_angular_rate;
            let r = cfg.radius * cfg.inner_ring_radius_factor;
            Vec3::new(a.cos() * r, flutter_y * cfg.inner_ring_height_factor, a.sin() * r)
        }
        RouteShape::Mobius => {
            let u = angle * cfg.mobius_angular_rate;
            let v = slot.lane * cfg.mobius_half_width;
            let half = u * 0.5;
            let radial = cfg.radius * cfg.mobius_radius_factor + v * half.cos();
            Vec3::new(
                u.cos() * radial,
                v * half.sin() + flutter_y * cfg.mobius_flutter_mix,
                u.sin() * radial,
            )
        }
        RouteShape::Cube => {
            let xz = route_xz(angle, morph, cfg.radius);
            Vec3::new(xz.x, flutter_y, xz.y)
        }
        RouteShape::Cylinder | RouteShape::DoubleCylinder => {
            let xz = route_xz(angle, 0.0, cfg.radius);
            Vec3::new(xz.x, flutter_y, xz.y)
        }
    }
}
