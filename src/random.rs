//! Stable hashing and injectable randomness
//!
//! Every probabilistic branch in the engine draws from a [`RandomSource`] so
//! that tests can pin the sequence. Per-flight pseudo-determinism uses
//! [`stable_hash`], which is identical across processes and platforms.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

const HASH_KEY_0: u64 = 0x6661_7265_2d65_6e67;
const HASH_KEY_1: u64 = 0x7072_6963_696e_6773;

/// Fixed-key SipHash-1-3 of a string's bytes.
///
/// Unlike `std::collections::hash_map::DefaultHasher`, the keys are constant,
/// so the same flight identifier maps to the same value in every process.
pub fn stable_hash(key: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
    hasher.write(key.as_bytes());
    hasher.finish()
}

/// Source of uniform random draws
pub trait RandomSource: Send + Sync {
    /// Next draw, uniform in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform draw in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform integer in `[low, high]`
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        let span = f64::from(high - low + 1);
        let offset = (self.next_f64() * span).floor() as u32;
        low + offset.min(high - low)
    }
}

/// Uniform pick from a non-empty slice
pub fn choose<T: Copy>(rng: &mut dyn RandomSource, items: &[T]) -> T {
    let index = rng.range_inclusive(0, items.len() as u32 - 1) as usize;
    items[index]
}

/// `StdRng`-backed random source
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Every draw returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}
