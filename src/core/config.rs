//! Engine configuration.
//!
//! Hosts configure the engine once at construction:
//! - `dice_seed`: fixed seed for reproducible games, or `None` for entropy
//! - `strict_moves`: reject committed moves the evaluator did not offer
//! - `max_players`: seat limit per game (never more than the four colours)
//!
//! ```
//! use ludo_rules::core::EngineConfig;
//!
//! let config = EngineConfig::new().with_dice_seed(7).strict();
//! assert_eq!(config.dice_seed, Some(7));
//! assert!(config.strict_moves);
//! ```

use serde::{Deserialize, Serialize};

use super::color::COLOR_COUNT;

/// Configuration for an [`Engine`](crate::rules::Engine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the dice RNG. `None` seeds from OS entropy.
    pub dice_seed: Option<u64>,

    /// When set, `commit_move` checks the declared move against the
    /// evaluator's options and fails with `IllegalMove` on mismatch.
    /// Off by default: clients are trusted to submit an offered move.
    pub strict_moves: bool,

    /// Maximum number of seated players per game.
    pub max_players: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dice_seed: None,
            strict_moves: false,
            max_players: COLOR_COUNT,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed dice seed (builder pattern).
    #[must_use]
    pub fn with_dice_seed(mut self, seed: u64) -> Self {
        self.dice_seed = Some(seed);
        self
    }

    /// Enable strict move validation (builder pattern).
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict_moves = true;
        self
    }

    /// Limit seats per game. Clamped to `1..=4`.
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max.clamp(1, COLOR_COUNT);
        self
    }
}
