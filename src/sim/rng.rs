//! Seeded random stream for reproducible spawn layouts
//!
//! One PCG stream per simulation. Every random draw in the crate goes
//! through here so a seed fully determines the entity layout.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw a fresh seed from the thread RNG. The seed is kept so the run can be replayed.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform in [min, max); a degenerate range yields `min`
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }

    /// Uniform integer in [min, max] inclusive; a degenerate range yields `min`
    pub fn range_int(&mut self, min: i32, max: i32) -> i32 {
        if max > min {
            self.rng.random_range(min..=max)
        } else {
            min
        }
    }

    /// Random unit vector
    pub fn direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.range(0.0, std::f32::consts::TAU))
    }

    /// True with probability `p` (clamped to [0, 1])
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.random_bool(f64::from(p.clamp(0.0, 1.0)))
    }
}
