//! Connector lines pairing particles across the ring.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use rand::Rng;

use super::facing::angular_distance;

/// `k` distinct indices from `0..n`, via a partial Fisher-Yates shuffle.
pub fn pick_random_indices<R: Rng>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..n).collect();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.gen_range(i..n);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

#[derive(Clone, Debug, Default)]
pub struct Links {
    pairs: Vec<(usize, usize)>,
    segments: Vec<[Vec3; 2]>,
}

impl Links {
    pub fn with_capacity(line_count: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(line_count),
            segments: Vec::with_capacity(line_count),
        }
    }

    /// Re-pair `line_count` particles. Side A is a random subset; each A
    /// particle prefers a partner from the rest whose angle sits within a
    /// quarter turn of its opposite point. Partners are never reused.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, theta: &[f32], line_count: usize) {
        let n = theta.len();
        self.pairs.clear();
        if line_count == 0 || n == 0 {
            self.segments.clear();
            return;
        }
        let side_a = pick_random_indices(rng, n, line_count);
        let mut on_side_a = vec![false; n];
        for &a in &side_a {
            on_side_a[a] = true;
        }
        let mut available: Vec<usize> = (0..n).filter(|&i| !on_side_a[i]).collect();
        let mut opposite: Vec<usize> = Vec::new();

        for &a in &side_a {
            if available.is_empty() {
                self.pairs.push((a, a));
                continue;
            }
            let target = theta[a] + PI;
            opposite.clear();
            opposite.extend(
                (0..available.len())
                    .filter(|&slot| angular_distance(theta[available[slot]], target) <= FRAC_PI_2),
            );
            let pick = if opposite.is_empty() {
                rng.gen_range(0..available.len())
            } else {
                opposite[rng.gen_range(0..opposite.len())]
            };
            let b = available.swap_remove(pick);
            self.pairs.push((a, b));
        }
        self.segments.resize(self.pairs.len(), [Vec3::ZERO; 2]);
    }

    /// Refresh endpoints from live positions, falling back to the ring
    /// position when a live one is not finite.
    pub fn update_segments(&mut self, positions: &[Vec3], ring: &[Vec3]) {
        let pick = |i: usize| -> Vec3 {
            match positions.get(i) {
                Some(p) if p.is_finite() => *p,
                _ => ring.get(i).copied().unwrap_or(Vec3::ZERO),
            }
        };
        for (segment, &(a, b)) in self.segments.iter_mut().zip(&self.pairs) {
            *segment = [pick(a), pick(b)];
        }
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn segments(&self) -> &[[Vec3; 2]] {
        &self.segments
    }
}
