//! Round records: one per turn.
//!
//! ## State machine
//!
//! ```text
//! AwaitingRoll --roll--> AwaitingMove --close--> Closed
//!      |                                           ^
//!      +------------------close--------------------+
//! ```
//!
//! Linear, no cycle back. Rolling a 6 does not reopen a round; it is read
//! later by the hand-off table to give the same player the next round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::core::{DiceRng, EngineError, EngineResult, GameId, PlayerId, RoundId, TechnicalFault};
use crate::pawn::PawnName;

/// Status of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    /// The player has not rolled yet.
    AwaitingRoll,
    /// The dice is rolled, the player has to pick a move.
    AwaitingMove,
    /// The turn is over.
    Closed,
}

impl RoundStatus {
    /// Check if the round still accepts actions.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, RoundStatus::Closed)
    }
}

/// The move a player committed for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    pub pawn: PawnName,
    pub from: Cell,
    pub to: Cell,
}

impl MoveDescriptor {
    /// Create a move descriptor.
    #[must_use]
    pub const fn new(pawn: PawnName, from: Cell, to: Cell) -> Self {
        Self { pawn, from, to }
    }
}

/// One turn of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub game_id: GameId,
    /// The player whose turn it is.
    pub player_id: PlayerId,
    pub dice: Option<u8>,
    pub dice_rolled_at: Option<DateTime<Utc>>,
    /// Set when the round closes on a committed move. Forfeited rounds close
    /// without one.
    pub chosen_move: Option<MoveDescriptor>,
    pub status: RoundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Round {
    /// Open a new round for a player.
    #[must_use]
    pub fn new(game_id: GameId, player_id: PlayerId, now: DateTime<Utc>) -> Self {
        Self {
            id: RoundId::new(),
            game_id,
            player_id,
            dice: None,
            dice_rolled_at: None,
            chosen_move: None,
            status: RoundStatus::AwaitingRoll,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the round still accepts actions.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Dice value, or `DiceNotLaunched` when the player has not rolled.
    pub fn dice_value(&self) -> EngineResult<u8> {
        self.dice.ok_or(EngineError::DiceNotLaunched(self.id))
    }

    /// Roll the dice for this round.
    ///
    /// ## Errors
    ///
    /// - `NotYourTurn` when `actor` is not the round's player
    /// - `TechnicalFault::RoundAlreadyClosed` when the round is closed
    /// - `DiceAlreadyLaunched` when a value was already drawn
    pub fn roll(&mut self, actor: PlayerId, rng: &mut DiceRng, now: DateTime<Utc>) -> EngineResult<u8> {
        if actor != self.player_id {
            return Err(EngineError::NotYourTurn);
        }
        match self.status {
            RoundStatus::Closed => Err(TechnicalFault::RoundAlreadyClosed(self.id).into()),
            RoundStatus::AwaitingMove => Err(EngineError::DiceAlreadyLaunched(self.id)),
            RoundStatus::AwaitingRoll => {
                let value = rng.roll_die();
                self.dice = Some(value);
                self.dice_rolled_at = Some(now);
                self.status = RoundStatus::AwaitingMove;
                self.updated_at = now;
                Ok(value)
            }
        }
    }

    /// Close the round, recording the committed move if there is one.
    ///
    /// ## Errors
    ///
    /// `TechnicalFault::RoundAlreadyClosed` when the round is closed.
    pub fn close(&mut self, chosen_move: Option<MoveDescriptor>, now: DateTime<Utc>) -> EngineResult<()> {
        if !self.is_open() {
            return Err(TechnicalFault::RoundAlreadyClosed(self.id).into());
        }
        self.chosen_move = chosen_move;
        self.status = RoundStatus::Closed;
        self.updated_at = now;
        Ok(())
    }
}
