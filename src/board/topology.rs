//! Static board geometry.
//!
//! The ring is 56 cells long: four quarters of 14 cells, concatenated in
//! colour order (Blue, Red, Green, Yellow). Each colour's quarter starts with
//! that colour's *final road cell*, the cell its pawns leave the ring from,
//! followed by its *road entry cell*, where pawns arrive from the pen. A pawn
//! therefore travels a full lap minus one cell before turning into its lane.
//!
//! ```text
//! ring index   0      1      2  ...  13 | 14     15  ...
//! Blue quarter 0xx7   0xx8   1xx8 ... 6xx14 | Red quarter 7xx14 8xx14 ...
//!              final  entry
//! ```
//!
//! Everything here is pure data and total over the enumerated cells.

use crate::core::{Color, COLOR_COUNT};

use super::cell::{Cell, Coord};

/// Cells per colour quarter of the ring.
pub const QUARTER_LEN: usize = 14;

/// Cells in the shared ring.
pub const RING_LEN: usize = QUARTER_LEN * COLOR_COUNT;

/// Cells in each colour's lane.
pub const LANE_LEN: usize = 6;

/// Cells in each colour's pen (one per pawn).
pub const PEN_SIZE: usize = 4;

/// Grid position of the shared centre.
pub const CENTER_COORD: Coord = Coord::new(7, 7);

const fn c(x: u8, y: u8) -> Coord {
    Coord::new(x, y)
}

/// The ring, in traversal order.
pub(crate) const RING: [Coord; RING_LEN] = [
    // Blue
    c(0, 7), c(0, 8), c(1, 8), c(2, 8), c(3, 8), c(4, 8), c(5, 8),
    c(6, 8), c(6, 9), c(6, 10), c(6, 11), c(6, 12), c(6, 13), c(6, 14),
    // Red
    c(7, 14), c(8, 14), c(8, 13), c(8, 12), c(8, 11), c(8, 10), c(8, 9),
    c(8, 8), c(9, 8), c(10, 8), c(11, 8), c(12, 8), c(13, 8), c(14, 8),
    // Green
    c(14, 7), c(14, 6), c(13, 6), c(12, 6), c(11, 6), c(10, 6), c(9, 6),
    c(8, 6), c(8, 5), c(8, 4), c(8, 3), c(8, 2), c(8, 1), c(8, 0),
    // Yellow
    c(7, 0), c(6, 0), c(6, 1), c(6, 2), c(6, 3), c(6, 4), c(6, 5),
    c(6, 6), c(5, 6), c(4, 6), c(3, 6), c(2, 6), c(1, 6), c(0, 6),
];

/// Lanes per colour (indexed by `Color::index`), entry first.
pub(crate) const LANES: [[Coord; LANE_LEN]; COLOR_COUNT] = [
    [c(1, 7), c(2, 7), c(3, 7), c(4, 7), c(5, 7), c(6, 7)],
    [c(7, 13), c(7, 12), c(7, 11), c(7, 10), c(7, 9), c(7, 8)],
    [c(13, 7), c(12, 7), c(11, 7), c(10, 7), c(9, 7), c(8, 7)],
    [c(7, 1), c(7, 2), c(7, 3), c(7, 4), c(7, 5), c(7, 6)],
];

/// Pens per colour (indexed by `Color::index`), slot order matches pawn
/// numbering: `Blue.1` lives in slot 0.
pub(crate) const PENS: [[Coord; PEN_SIZE]; COLOR_COUNT] = [
    [c(0, 14), c(0, 13), c(1, 13), c(1, 14)],
    [c(13, 13), c(14, 14), c(13, 14), c(14, 13)],
    [c(13, 0), c(14, 0), c(13, 1), c(14, 1)],
    [c(0, 0), c(0, 1), c(1, 0), c(1, 1)],
];

/// Ring index of the first cell of a colour's quarter.
#[must_use]
pub const fn quarter_start(color: Color) -> usize {
    color.index() * QUARTER_LEN
}

/// The 14 ring cells of a colour's quarter, in traversal order.
#[must_use]
pub fn road_sequence(color: Color) -> [Cell; QUARTER_LEN] {
    let start = quarter_start(color);
    std::array::from_fn(|k| Cell::road(start + k))
}

/// A colour's lane, from lane entry to the cell next to the centre.
#[must_use]
pub fn lane_sequence(color: Color) -> [Cell; LANE_LEN] {
    std::array::from_fn(|step| Cell::Lane { color, step: step as u8 })
}

/// The cells pawns of a colour are created into.
#[must_use]
pub fn pen_spawn_cells(color: Color) -> [Cell; PEN_SIZE] {
    std::array::from_fn(|slot| Cell::Pen { color, slot: slot as u8 })
}

/// The ring cell a pawn leaves its pen onto.
#[must_use]
pub const fn road_entry_cell(color: Color) -> Cell {
    Cell::road(quarter_start(color) + 1)
}

/// The last ring cell before a colour's lane.
#[must_use]
pub const fn final_road_cell(color: Color) -> Cell {
    Cell::road(quarter_start(color))
}

/// Every ring cell, in traversal order.
pub fn ring_cells() -> impl Iterator<Item = Cell> {
    (0..RING_LEN).map(Cell::road)
}

/// Every cell of the board: ring, lanes, centre, pens.
pub fn all_cells() -> impl Iterator<Item = Cell> {
    ring_cells()
        .chain(Color::ALL.into_iter().flat_map(lane_sequence))
        .chain(std::iter::once(Cell::Center))
        .chain(Color::ALL.into_iter().flat_map(pen_spawn_cells))
}
