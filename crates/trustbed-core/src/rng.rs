//! Seeded random sampling shared by models and scenarios.
//!
//! Every plugin draws through [`EvalRng`] so that a run is fully determined
//! by its seed. The helpers mirror the sampling needs of the reference
//! plugins: truncated normals for noisy observations, weighted choices for
//! deception assignment, and fraction-sized subsets for partner pools.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Deterministic random source for evaluation plugins.
pub struct EvalRng {
    inner: SmallRng,
}

impl EvalRng {
    /// Creates a generator from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw from `[0, 1)`.
    pub fn unit_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Uniform draw from `[lo, hi)`.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        self.inner.gen_range(lo..hi)
    }

    /// Uniform integer draw from `[lo, hi]`, inclusive on both ends.
    pub fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        self.inner.gen_range(lo..=hi)
    }

    /// Draws from a normal distribution truncated to `[0, 1]` by rejection.
    ///
    /// The caller must pass `mean` within the unit interval, otherwise the
    /// rejection loop may never terminate; plugin constructors validate
    /// their parameters before sampling.
    pub fn unit_tnd(&mut self, mean: f64, sd: f64) -> f64 {
        debug_assert!((0.0..=1.0).contains(&mean));
        debug_assert!(sd >= 0.0);
        loop {
            let z: f64 = self.inner.sample(StandardNormal);
            let x = mean + sd * z;
            if (0.0..=1.0).contains(&x) {
                return x;
            }
        }
    }

    /// Weighted choice over a probability mass function.
    ///
    /// Walks the map in key order accumulating weights and returns the first
    /// key whose cumulative weight exceeds a uniform draw. Weights must be
    /// non-negative and sum to 1 within a small tolerance; the caller
    /// validates. Returns `None` for an empty map. Accumulated rounding can
    /// leave the draw above the final cumulative weight, in which case the
    /// last key wins.
    pub fn from_weights<K: Ord + Copy>(&mut self, weights: &BTreeMap<K, f64>) -> Option<K> {
        let draw = self.unit_uniform();
        let mut cumulative = 0.0;
        let mut last = None;
        for (&key, &weight) in weights {
            cumulative += weight;
            if draw < cumulative {
                return Some(key);
            }
            last = Some(key);
        }
        last
    }

    /// Samples `round(fraction * items.len())` distinct items without
    /// replacement. `fraction` must lie in `[0, 1]`.
    pub fn choose_fraction<T: Copy>(&mut self, items: &[T], fraction: f64) -> Vec<T> {
        debug_assert!((0.0..=1.0).contains(&fraction));
        let count = (items.len() as f64 * fraction).round() as usize;
        let mut pool: Vec<T> = items.to_vec();
        for i in 0..count {
            let j = self.inner.gen_range(i..pool.len());
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool
    }
}
