//! Randomness used for phrase choice and recovery-pose jitter.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform random choices
pub trait RandomSource {
    /// Uniform index in `0..len`; `len` is never zero
    fn choose_index(&mut self, len: usize) -> usize;

    /// Uniform integer in `low..=high`
    fn range_inclusive(&mut self, low: i32, high: i32) -> i32;
}

/// Thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn choose_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Reproducible RNG
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        self.rng.gen_range(low..=high)
    }
}
