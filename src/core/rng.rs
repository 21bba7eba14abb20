//! Dice rolling backed by a deterministic, serialisable RNG.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the identical sequence of rolls
//! - **Entropy fallback**: Unseeded engines draw their seed from the OS
//!
//! ## Usage
//!
//! ```
//! use ludo_rules::core::DiceRng;
//!
//! let mut dice = DiceRng::new(42);
//! let roll = dice.roll_die();
//! assert!((1..=6).contains(&roll));
//!
//! // Same seed, same rolls
//! let mut replay = DiceRng::new(42);
//! assert_eq!(replay.roll_die(), roll);
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lowest face of the die.
pub const DIE_MIN: u8 = 1;

/// Highest face of the die. Rolling it grants an extra turn.
pub const DIE_MAX: u8 = 6;

/// Deterministic dice RNG.
///
/// Uses ChaCha8 for speed while keeping a reproducible, uniform stream.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DiceRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().next_u64();
        Self::new(seed)
    }

    /// Create a seeded RNG when a seed is given, an entropy-seeded one otherwise.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a six-sided die: uniform in `[1, 6]`.
    pub fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(DIE_MIN..=DIE_MAX)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
