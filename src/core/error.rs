//! Error types.
//!
//! Two families are kept apart:
//! - **Rule violations** (`NotYourTurn`, `DiceNotLaunched`, ...) are returned
//!   to the caller unchanged and never retried.
//! - **Technical faults** wrap storage failures and broken invariants
//!   (committing an already-closed round, a poisoned lock).

use thiserror::Error;

use super::color::Color;
use super::ids::{GameId, PlayerId, RoundId};
use crate::board::Cell;
use crate::pawn::PawnName;

/// Failure reported by a storage adapter.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// An update targeted a record that does not exist.
    #[error("record {0} does not exist")]
    Missing(String),

    /// A create collided with an existing record.
    #[error("record {0} already exists")]
    Duplicate(String),
}

/// Infrastructure failure or invariant violation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TechnicalFault {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("round {0} is already closed")]
    RoundAlreadyClosed(RoundId),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Errors surfaced by engine operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("it's not your turn to play")]
    NotYourTurn,

    #[error("the dice for round {0} has not been launched")]
    DiceNotLaunched(RoundId),

    #[error("the dice for round {0} has already been launched")]
    DiceAlreadyLaunched(RoundId),

    #[error("round {0} not found")]
    RoundNotFound(RoundId),

    #[error("pawn {0} not found")]
    PawnNotFound(PawnName),

    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("game {0} has already started")]
    GameAlreadyStarted(GameId),

    #[error("color {0} is already taken")]
    ColorAlreadyTaken(Color),

    #[error("player {0} is not seated in this game")]
    PlayerNotInGame(PlayerId),

    #[error("a game needs between 1 and {max} players, got {count}")]
    InvalidPlayerCount { count: usize, max: usize },

    #[error("moving {pawn} from {from} to {to} is not allowed")]
    IllegalMove { pawn: PawnName, from: Cell, to: Cell },

    #[error("technical fault: {0}")]
    Technical(#[from] TechnicalFault),
}

impl EngineError {
    /// True for errors caused by the caller breaking a game rule, false for
    /// technical faults.
    #[must_use]
    pub fn is_rule_violation(&self) -> bool {
        !matches!(self, EngineError::Technical(_))
    }

    /// Shorthand for an invariant violation.
    pub fn invariant(message: impl Into<String>) -> Self {
        EngineError::Technical(TechnicalFault::Invariant(message.into()))
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Technical(TechnicalFault::Store(err))
    }
}

/// Result type for storage adapters.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
