//! Seeded randomness shared by every generation stage
//!
//! A floor is a pure function of its configuration and a `u64` seed, so the
//! sequence of draws made here is fixed by the pipeline order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Draw source for one generation run
///
/// The packer, path search, expansion and door stages all pull from one
/// handle in a fixed order. Serializes as its bare seed, which means a
/// restored handle replays from the first draw rather than resuming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct MapRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl From<u64> for MapRng {
    fn from(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl From<MapRng> for u64 {
    fn from(rng: MapRng) -> Self {
        rng.seed
    }
}

impl MapRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeded from the thread RNG, for runs without a chosen seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this handle started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `0..n`; `n == 0` gives 0 and leaves the stream untouched
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform in `lo..hi`; an empty range gives `lo` without a draw
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform in `lo..=hi`
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform value in [0, 1)
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> usize {
        self.rn2(len as u32) as usize
    }

    /// A uniformly picked element, `None` for an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}

impl Default for MapRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
