//! Pawn movement resolution.
//!
//! One arithmetic rule covers every colour: a ring pawn advances `dice`
//! cells along the 56-cell ring, wrapping at the end. Two transitions are
//! special:
//!
//! - **Lane entry**: from its final road cell a pawn turns into its lane
//!   with a roll of exactly 1.
//! - **Lane progress / centre entry**: on the lane a pawn climbs one cell
//!   per turn, and only with the exact roll from [`LANE_ROLLS`]. From the
//!   last lane cell that roll (a 6) takes it into the centre.
//!
//! ```
//! use ludo_rules::board::Cell;
//! use ludo_rules::core::{Color, GameId, PlayerId};
//! use ludo_rules::pawn::{destination_cell, Pawn, PawnName};
//!
//! let name = PawnName::new(Color::Blue, 1).unwrap();
//! let pawn = Pawn::spawn(GameId::new(), PlayerId::new(), name, chrono::Utc::now())
//!     .at("0xx8".parse().unwrap());
//!
//! assert_eq!(destination_cell(&pawn, 6), Some("6xx8".parse::<Cell>().unwrap()));
//! ```

use smallvec::SmallVec;

use crate::board::{final_road_cell, quarter_start, Cell, LANE_LEN, RING_LEN};
use crate::core::Color;

use super::model::Pawn;

/// Exact roll needed to leave each lane step. Steps 0..=4 advance one lane
/// cell; step 5 advances into the centre.
pub const LANE_ROLLS: [u8; LANE_LEN] = [2, 3, 4, 5, 6, 6];

/// Roll needed to turn from the final road cell into the lane.
pub const LANE_ENTRY_ROLL: u8 = 1;

/// Cells traversed by one move. A die never exceeds six cells.
pub type Path = SmallVec<[Cell; 6]>;

/// Ring steps from `index` to `color`'s final road cell.
fn ring_distance(color: Color, index: usize) -> usize {
    (quarter_start(color) + RING_LEN - index) % RING_LEN
}

/// Remaining ring cells before the pawn reaches its final road cell.
///
/// 0 when the pawn is already on its final road cell or beyond (lane,
/// centre). Pen pawns are not on the ring and also report 0.
#[must_use]
pub fn distance_to_lane_entry(pawn: &Pawn) -> usize {
    match pawn.cell {
        Cell::Road(index) => ring_distance(pawn.color, index as usize),
        Cell::Lane { .. } | Cell::Center | Cell::Pen { .. } => 0,
    }
}

/// Check if the pawn sits on its colour's last ring cell.
#[must_use]
pub fn is_on_final_road_cell(pawn: &Pawn) -> bool {
    pawn.cell == final_road_cell(pawn.color)
}

/// Check if the pawn is on its own lane.
#[must_use]
pub fn is_on_lane(pawn: &Pawn) -> bool {
    matches!(pawn.cell, Cell::Lane { color, .. } if color == pawn.color)
}

/// Check if a lane pawn may climb with this roll.
#[must_use]
pub fn can_progress_on_lane(pawn: &Pawn, dice: u8) -> bool {
    match pawn.cell {
        Cell::Lane { color, step } if color == pawn.color => LANE_ROLLS
            .get(step as usize)
            .is_some_and(|&needed| needed == dice),
        _ => false,
    }
}

/// Check if this roll takes the pawn into its lane or further along it.
///
/// From the ring only the exact step count onto the first lane cell is
/// accepted, which means a 1 from the final road cell. On the lane the exact
/// roll table decides.
#[must_use]
pub fn can_enter_lane(pawn: &Pawn, dice: u8) -> bool {
    if is_on_lane(pawn) {
        return can_progress_on_lane(pawn, dice);
    }
    is_on_final_road_cell(pawn) && dice as usize == distance_to_lane_entry(pawn) + LANE_ENTRY_ROLL as usize
}

/// Where the pawn lands with this roll.
///
/// `None` when the pawn cannot move by rolling: it is in the pen or the
/// centre, or it is on the lane and the roll is not the exact one.
#[must_use]
pub fn destination_cell(pawn: &Pawn, dice: u8) -> Option<Cell> {
    match pawn.cell {
        Cell::Road(_) if dice == LANE_ENTRY_ROLL && is_on_final_road_cell(pawn) => {
            Some(Cell::Lane { color: pawn.color, step: 0 })
        }
        Cell::Road(index) => Some(Cell::road(index as usize + dice as usize)),
        Cell::Lane { color, step } if can_progress_on_lane(pawn, dice) => {
            if (step as usize) + 1 < LANE_LEN {
                Some(Cell::Lane { color, step: step + 1 })
            } else {
                Some(Cell::Center)
            }
        }
        Cell::Lane { .. } | Cell::Center | Cell::Pen { .. } => None,
    }
}

/// Ring cells crossed by a `dice` move from `source`, source excluded and
/// destination included, wrapping past the end of the ring.
///
/// Empty for sources that are not on the ring.
#[must_use]
pub fn cells_between(source: Cell, dice: u8) -> Path {
    match source {
        Cell::Road(index) => (1..=dice as usize)
            .map(|step| Cell::road(index as usize + step))
            .collect(),
        Cell::Lane { .. } | Cell::Center | Cell::Pen { .. } => Path::new(),
    }
}
