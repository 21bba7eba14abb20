//! Pawns: records, names and movement resolution.

pub mod model;
pub mod movement;

pub use model::{ParsePawnNameError, Pawn, PawnName, PAWNS_PER_PLAYER};
pub use movement::{
    can_enter_lane, can_progress_on_lane, cells_between, destination_cell, distance_to_lane_entry,
    is_on_final_road_cell, is_on_lane, Path, LANE_ENTRY_ROLL, LANE_ROLLS,
};
