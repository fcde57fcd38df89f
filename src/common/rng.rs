//! Seeded random number generator for deterministic simulation.
//!
//! Every random decision in the core (crit rolls, spread jitter, boss
//! branch choice, spawn-ring sampling) draws from this one resource.
//! Tests construct it from a fixed seed and get reproducible runs.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic).
    pub seed: Option<u64>,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random_f32(&mut self) -> f32 {
        self.rng.r#gen()
    }

    /// Random f32 in `[min, max)`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Bernoulli draw with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random_f32() < p
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
