//! Seedable random source for chance-gated spells.
//!
//! A match owns exactly one `GameRng`. Defence strip rolls and Fortune
//! draws both pull from it in resolution order, so replaying a seed with
//! the same moves replays the same match.
//!
//! ```
//! use astral_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll(0.4), b.roll(0.4));
//!
//! // Resume from a checkpoint mid-match
//! let saved = a.checkpoint();
//! let next = a.below(100);
//! assert_eq!(GameRng::resume(&saved).below(100), next);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True with probability `chance`, clamped to `0.0..=1.0`.
    pub fn roll(&mut self, chance: f64) -> bool {
        self.inner.gen_bool(chance.clamp(0.0, 1.0))
    }

    /// Uniform integer in `0..bound`. Zero for an empty range.
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.inner.gen_range(0..bound)
    }

    pub fn pick<'a, T>(&mut self, pool: &'a [T]) -> Option<&'a T> {
        pool.choose(&mut self.inner)
    }

    /// `count` independent picks from `pool`, with replacement.
    ///
    /// Empty when the pool is empty.
    pub fn draw<T: Copy>(&mut self, pool: &[T], count: usize) -> Vec<T> {
        if pool.is_empty() {
            return Vec::new();
        }
        (0..count).filter_map(|_| self.pick(pool).copied()).collect()
    }

    #[must_use]
    pub fn checkpoint(&self) -> RngCheckpoint {
        RngCheckpoint {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    #[must_use]
    pub fn resume(checkpoint: &RngCheckpoint) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(checkpoint.seed);
        inner.set_word_pos(checkpoint.word_pos);
        Self {
            inner,
            seed: checkpoint.seed,
        }
    }
}

/// Position of a `GameRng` in its stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngCheckpoint {
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
}
