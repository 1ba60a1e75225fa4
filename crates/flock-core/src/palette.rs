//! Per-particle tint subsystems driven by colour triggers.
//!
//! Only tints are touched here; positions are read for the infection spread.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::easing::{lerp, wrap01};

// Hue anchors for the family mode: red, orange, yellow, green, blue, indigo, violet.
pub const FAMILY_HUES: [f32; 7] = [0.0, 0.08, 0.15, 0.33, 0.58, 0.71, 0.83];
const FAMILY_SPREAD: f32 = 0.045;
const INFECTION_BATCH: usize = 15; // particles infected per trigger
const INFECTION_HUE_JITTER: f32 = 0.03;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Infection,
    Family,
    Rainbow,
}

impl ColorMode {
    pub fn next(self) -> Self {
        match self {
            ColorMode::Infection => ColorMode::Family,
            ColorMode::Family => ColorMode::Rainbow,
            ColorMode::Rainbow => ColorMode::Infection,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Infection => "infection",
            ColorMode::Family => "family",
            ColorMode::Rainbow => "rainbow",
        }
    }
}

/// HSL (all components in [0, 1]) to linear RGB triple.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = wrap01(h);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return Vec3::splat(l);
    }
    let hi = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let lo = 2.0 * l - hi;
    Vec3::new(
        hue_to_rgb(lo, hi, h + 1.0 / 3.0),
        hue_to_rgb(lo, hi, h),
        hue_to_rgb(lo, hi, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(lo: f32, hi: f32, t: f32) -> f32 {
    let t = wrap01(t);
    if t < 1.0 / 6.0 {
        return lo + (hi - lo) * 6.0 * t;
    }
    if t < 0.5 {
        return hi;
    }
    if t < 2.0 / 3.0 {
        return lo + (hi - lo) * 6.0 * (2.0 / 3.0 - t);
    }
    lo
}

/// Which particles carry the current infection hue.
#[derive(Clone, Debug, Default)]
pub struct Infection {
    pub hue: f32,
    infected: Vec<bool>,
    members: Vec<usize>,
}

impl Infection {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_infected(&self, index: usize) -> bool {
        self.infected.get(index).copied().unwrap_or(false)
    }
}

pub struct Palette {
    mode: ColorMode,
    infection: Infection,
    rng: StdRng,
}

impl Palette {
    pub fn new(seed: u64) -> Self {
        Self {
            mode: ColorMode::default(),
            infection: Infection::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn infection(&self) -> &Infection {
        &self.infection
    }

    /// Switch to the next mode. Tints change on the next colour trigger.
    pub fn cycle_mode(&mut self) -> ColorMode {
        self.mode = self.mode.next();
        log::debug!("[palette] mode {}", self.mode.name());
        self.mode
    }

    /// React to a colour trigger according to the active mode.
    pub fn trigger(&mut self, tints: &mut [Vec3], positions: &[Vec3]) {
        match self.mode {
            ColorMode::Rainbow => self.randomize_rainbow(tints),
            ColorMode::Family => self.randomize_family(tints),
            ColorMode::Infection => self.advance_infection(tints, positions),
        }
    }

    pub fn randomize_rainbow(&mut self, tints: &mut [Vec3]) {
        for tint in tints.iter_mut() {
            let h = self.rng.gen::<f32>();
            let s = lerp(0.7, 1.0, self.rng.gen());
            let l = lerp(0.42, 0.74, self.rng.gen());
            *tint = hsl_to_rgb(h, s, l);
        }
    }

    pub fn randomize_family(&mut self, tints: &mut [Vec3]) {
        let anchor = FAMILY_HUES[self.rng.gen_range(0..FAMILY_HUES.len())];
        for tint in tints.iter_mut() {
            let h = anchor + self.rng.gen_range(-FAMILY_SPREAD..=FAMILY_SPREAD);
            let s = lerp(0.65, 1.0, self.rng.gen());
            let l = lerp(0.4, 0.75, self.rng.gen());
            *tint = hsl_to_rgb(h, s, l);
        }
    }

    /// Clear the infection and seed a single particle with `hue` (random when
    /// `None`). Everyone else goes back to white.
    pub fn reset_infection(&mut self, tints: &mut [Vec3], hue: Option<f32>) {
        let n = tints.len();
        self.infection.hue = wrap01(hue.unwrap_or_else(|| self.rng.gen()));
        self.infection.infected.clear();
        self.infection.infected.resize(n, false);
        self.infection.members.clear();
        if n > 0 {
            let seed = self.rng.gen_range(0..n);
            self.infect(seed, tints);
        }
    }

    pub fn advance_infection(&mut self, tints: &mut [Vec3], positions: &[Vec3]) {
        let n = tints.len().min(positions.len());
        if self.infection.infected.len() != tints.len() || self.infection.count() == 0 {
            self.reset_infection(tints, None);
            return;
        }
        if self.infection.count() >= n {
            let hue = self.infection.hue + 0.5;
            self.reset_infection(tints, Some(hue));
            return;
        }
        for _ in 0..INFECTION_BATCH {
            match self.nearest_uninfected(positions, n) {
                Some(index) => self.infect(index, tints),
                None => break,
            }
        }
    }

    fn nearest_uninfected(&self, positions: &[Vec3], n: usize) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for i in 0..n {
            if self.infection.infected[i] {
                continue;
            }
            let d = self
                .infection
                .members
                .iter()
                .map(|&j| positions[i].distance_squared(positions[j]))
                .fold(f32::INFINITY, f32::min);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    fn infect(&mut self, index: usize, tints: &mut [Vec3]) {
        if self.infection.infected[index] {
            return;
        }
        self.infection.infected[index] = true;
        self.infection.members.push(index);
        let h = self.infection.hue
            + self
                .rng
                .gen_range(-INFECTION_HUE_JITTER..=INFECTION_HUE_JITTER);
        let s = lerp(0.72, 1.0, self.rng.gen());
        let l = lerp(0.42, 0.74, self.rng.gen());
        tints[index] = hsl_to_rgb(h, s, l);
    }
}
