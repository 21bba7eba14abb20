//! Move legality: what the player of an open round may do with the dice.
//!
//! [`evaluate`] is pure. It reads the round and a snapshot of every pawn of
//! the game and returns the [`TurnOptions`]: whether the roll grants an
//! extra turn, whether a pawn may leave the pen, and which pawns may move
//! and where to.
//!
//! ## Movability of a pawn on the board
//!
//! 1. A 1 on its final road cell takes it into its lane.
//! 2. On its lane it needs the exact roll for its step.
//! 3. On the ring the roll must not carry it past its final road cell.
//!    When more than one pawn is on the board, any pawn on a crossed cell
//!    blocks, and a pawn of the same owner on the destination blocks. An
//!    opponent on the destination is a capture, not a block.
//!
//! Pen pawns come last, all heading to the road entry cell.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{road_entry_cell, Cell};
use crate::core::{EngineResult, PawnId, PlayerId};
use crate::pawn::{
    can_progress_on_lane, cells_between, destination_cell, distance_to_lane_entry, is_on_final_road_cell,
    is_on_lane, Pawn, PawnName, LANE_ENTRY_ROLL,
};
use crate::round::{grants_extra_turn, NextActor, Round};

/// A pawn the player may move, with its source and destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovablePawn {
    pub pawn_id: PawnId,
    pub name: PawnName,
    pub source: Cell,
    pub destination: Cell,
}

/// Options open to the player of a round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOptions {
    /// The dice shows a 6.
    pub extra_turn: bool,
    /// A pawn may leave the pen.
    pub can_enter_from_pen: bool,
    /// Ring and lane moves in evaluation order, then pen exits.
    pub movable_pawns: Vec<MovablePawn>,
}

impl TurnOptions {
    /// Check if the player has something to move.
    #[must_use]
    pub fn has_moves(&self) -> bool {
        !self.movable_pawns.is_empty()
    }

    /// Check if moving `name` from `source` to `destination` is offered.
    #[must_use]
    pub fn allows(&self, name: PawnName, source: Cell, destination: Cell) -> bool {
        self.movable_pawns
            .iter()
            .any(|m| m.name == name && m.source == source && m.destination == destination)
    }

    /// Who plays next when the player can do nothing with this roll.
    ///
    /// `None` when there is a move to make.
    #[must_use]
    pub fn forfeit(&self) -> Option<NextActor> {
        if self.can_enter_from_pen || self.has_moves() {
            return None;
        }
        Some(if self.extra_turn {
            NextActor::SamePlayer
        } else {
            NextActor::NextPlayer
        })
    }
}

/// Evaluate the options of an open round.
///
/// `pawns` is every pawn of the round's game; ownership is read from
/// `round.player_id`.
///
/// ## Errors
///
/// `DiceNotLaunched` when the round has no dice value yet.
pub fn evaluate(round: &Round, pawns: &[Pawn]) -> EngineResult<TurnOptions> {
    let dice = round.dice_value()?;
    let player = round.player_id;

    let on_board: SmallVec<[&Pawn; 16]> = pawns.iter().filter(|p| p.is_on_board()).collect();

    let mut movable_pawns: Vec<MovablePawn> = on_board
        .iter()
        .filter(|p| p.player_id == player)
        .filter(|p| is_movable(p, &on_board, dice))
        .filter_map(|p| {
            destination_cell(p, dice).map(|destination| MovablePawn {
                pawn_id: p.id,
                name: p.name,
                source: p.cell,
                destination,
            })
        })
        .collect();

    let can_enter_from_pen = can_leave_pen(pawns, player, dice);
    if can_enter_from_pen {
        movable_pawns.extend(pawns.iter().filter(|p| p.player_id == player && p.is_in_pen()).map(|p| {
            MovablePawn {
                pawn_id: p.id,
                name: p.name,
                source: p.cell,
                destination: road_entry_cell(p.color),
            }
        }));
    }

    Ok(TurnOptions {
        extra_turn: grants_extra_turn(dice),
        can_enter_from_pen,
        movable_pawns,
    })
}

/// A 6, a free road entry cell (own pawns block, opponents get captured)
/// and at least one pawn waiting in the pen.
fn can_leave_pen(pawns: &[Pawn], player: PlayerId, dice: u8) -> bool {
    if !grants_extra_turn(dice) {
        return false;
    }
    let mut own = pawns.iter().filter(|p| p.player_id == player);
    let has_penned = own.clone().any(Pawn::is_in_pen);
    let entry_blocked = own.any(|p| p.cell == road_entry_cell(p.color));
    has_penned && !entry_blocked
}

fn is_movable(pawn: &Pawn, on_board: &[&Pawn], dice: u8) -> bool {
    if dice == LANE_ENTRY_ROLL && is_on_final_road_cell(pawn) {
        return true;
    }
    if is_on_lane(pawn) {
        return can_progress_on_lane(pawn, dice);
    }
    if dice as usize > distance_to_lane_entry(pawn) {
        return false;
    }
    if on_board.len() == 1 {
        // Alone on the board nothing blocks
        return true;
    }

    let path = cells_between(pawn.cell, dice);
    let Some((&destination, crossed)) = path.split_last() else {
        return false;
    };
    let crossed_free = crossed
        .iter()
        .all(|cell| on_board.iter().all(|other| other.cell != *cell));
    let destination_free = on_board
        .iter()
        .all(|other| other.cell != destination || other.player_id != pawn.player_id);
    crossed_free && destination_free
}
