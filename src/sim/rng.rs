//! Injectable randomness for gameplay draws
//!
//! Only spawner decisions draw from here (variant, delays, coin height).
//! Cosmetic jitter is hashed from the tick counter instead, so scripted
//! sources in tests see exactly the gameplay draws.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Source of uniform integer draws
pub trait RandomSource {
    /// Uniform integer in `[low, high]` (both inclusive, `low <= high`)
    fn between(&mut self, low: i32, high: i32) -> i32;

    /// Restart the sequence for a new run. Sources that cannot be reseeded
    /// keep their current sequence.
    fn reseed(&mut self, _seed: u64) {}
}

impl RandomSource for Pcg32 {
    fn between(&mut self, low: i32, high: i32) -> i32 {
        self.random_range(low..=high)
    }

    fn reseed(&mut self, seed: u64) {
        *self = Pcg32::seed_from_u64(seed);
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn between(&mut self, low: i32, high: i32) -> i32 {
        (**self).between(low, high)
    }

    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed);
    }
}

/// Seed wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Replays a fixed script of draws.
///
/// Each value is clamped into the requested range; once the script runs out
/// every draw returns `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: VecDeque<i32>,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: script.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of draws served so far
    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn between(&mut self, low: i32, high: i32) -> i32 {
        self.draws += 1;
        match self.script.pop_front() {
            Some(v) => v.clamp(low, high),
            None => low,
        }
    }
}

/// Cheap deterministic hash for cosmetic jitter (golden ratio multiply)
#[inline]
pub fn cosmetic_hash(tick: u64, salt: u32) -> u32 {
    ((tick as u32).wrapping_mul(2654435761)).wrapping_add(salt.wrapping_mul(7919))
}
