//! Board geometry: cells, coordinates and the static topology.
//!
//! The board has four disjoint kinds of cell:
//! - a 56-cell **ring** shared by every colour,
//! - a 6-cell **lane** per colour leading from the ring to the centre,
//! - the single shared **centre**, where pawns finish,
//! - a 4-cell **pen** per colour, where pawns start and return on capture.
//!
//! There is no state here, only data and pure lookups.

pub mod cell;
pub mod topology;

pub use cell::{Cell, Coord, ParseCellError, GRID_SIZE};
pub use topology::{
    all_cells, final_road_cell, lane_sequence, pen_spawn_cells, quarter_start,
    ring_cells, road_entry_cell, road_sequence, CENTER_COORD, LANE_LEN, PEN_SIZE, QUARTER_LEN,
    RING_LEN,
};
