//! Board cells and their grid coordinates.
//!
//! ## Coord
//!
//! The board is drawn on a 15×15 grid. A coordinate renders as `"{x}xx{y}"`,
//! e.g. `"0xx8"`. That string is the external identifier of a cell and must
//! stay stable so recorded games and client boards remain compatible.
//!
//! ## Cell
//!
//! A closed enum over the four disjoint cell families: shared ring road,
//! colour-private lane, the shared centre and colour-private pens.
//!
//! ```
//! use ludo_rules::board::{Cell, Coord};
//! use ludo_rules::core::Color;
//!
//! let cell: Cell = "1xx7".parse().unwrap();
//! assert_eq!(cell, Cell::Lane { color: Color::Blue, step: 0 });
//! assert_eq!(cell.coord(), Coord::new(1, 7));
//! assert_eq!(Cell::Center.to_string(), "7xx7");
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::topology::{self, CENTER_COORD, RING_LEN};
use crate::core::Color;

/// Side length of the square grid the board is drawn on.
pub const GRID_SIZE: u8 = 15;

/// A point on the 15×15 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column, `0..15`.
    pub x: u8,
    /// Row, `0..15`.
    pub y: u8,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Check the coordinate lies on the grid.
    #[must_use]
    pub const fn is_on_grid(self) -> bool {
        self.x < GRID_SIZE && self.y < GRID_SIZE
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}xx{}", self.x, self.y)
    }
}

/// Error returned when a string is not a board cell.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCellError {
    #[error("malformed coordinate {0:?}, expected \"<x>xx<y>\"")]
    Malformed(String),

    #[error("coordinate {0} is outside the 15x15 grid")]
    OffGrid(String),

    #[error("coordinate {0} is not a board cell")]
    NotACell(Coord),
}

impl std::str::FromStr for Coord {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseCellError::Malformed(s.to_string());
        let (x, y) = s.split_once("xx").ok_or_else(malformed)?;
        let x = parse_axis(x).ok_or_else(malformed)?;
        let y = parse_axis(y).ok_or_else(malformed)?;

        let coord = Coord::new(x, y);
        if !coord.is_on_grid() {
            return Err(ParseCellError::OffGrid(s.to_string()));
        }
        Ok(coord)
    }
}

/// Plain decimal digits only: no sign, no leading zero.
fn parse_axis(text: &str) -> Option<u8> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text.len() == 1 || !text.starts_with('0'));
    if canonical {
        text.parse().ok()
    } else {
        None
    }
}

/// A cell of the board.
///
/// The four families are pairwise disjoint; every pawn is always on exactly
/// one cell. Constructing a variant with an out-of-range index is a
/// programming error and panics when the cell is resolved to a coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cell {
    /// Ring cell, index `0..56` into the shared ring.
    Road(u8),
    /// Lane cell private to `color`, `step` `0..6` from the ring exit.
    Lane { color: Color, step: u8 },
    /// The shared terminal cell.
    Center,
    /// Pen cell private to `color`, `slot` `0..4`.
    Pen { color: Color, slot: u8 },
}

impl Cell {
    /// Ring cell at `index`, wrapping around the ring.
    #[must_use]
    pub const fn road(index: usize) -> Self {
        Cell::Road((index % RING_LEN) as u8)
    }

    /// Check if this is a ring cell.
    #[must_use]
    pub const fn is_road(self) -> bool {
        matches!(self, Cell::Road(_))
    }

    /// Check if this is a lane cell (of any colour).
    #[must_use]
    pub const fn is_lane(self) -> bool {
        matches!(self, Cell::Lane { .. })
    }

    /// Check if this is the centre.
    #[must_use]
    pub const fn is_center(self) -> bool {
        matches!(self, Cell::Center)
    }

    /// Check if this is a pen cell (of any colour).
    #[must_use]
    pub const fn is_pen(self) -> bool {
        matches!(self, Cell::Pen { .. })
    }

    /// Ring index, for ring cells.
    #[must_use]
    pub const fn ring_index(self) -> Option<usize> {
        match self {
            Cell::Road(index) => Some(index as usize),
            _ => None,
        }
    }

    /// Owning colour of a private cell (lane or pen).
    #[must_use]
    pub const fn owner(self) -> Option<Color> {
        match self {
            Cell::Lane { color, .. } | Cell::Pen { color, .. } => Some(color),
            Cell::Road(_) | Cell::Center => None,
        }
    }

    /// Grid coordinate of this cell.
    #[must_use]
    pub fn coord(self) -> Coord {
        match self {
            Cell::Road(index) => topology::RING[index as usize],
            Cell::Lane { color, step } => topology::LANES[color.index()][step as usize],
            Cell::Center => CENTER_COORD,
            Cell::Pen { color, slot } => topology::PENS[color.index()][slot as usize],
        }
    }

    /// Resolve a grid coordinate to a cell. `None` for points that are not
    /// part of the board (the blank corners and the arms' inner edges).
    #[must_use]
    pub fn from_coord(coord: Coord) -> Option<Cell> {
        if !coord.is_on_grid() {
            return None;
        }
        coord_lookup()[coord.y as usize][coord.x as usize]
    }
}

type Grid = [[Option<Cell>; GRID_SIZE as usize]; GRID_SIZE as usize];

/// Reverse lookup table, built once on first use.
fn coord_lookup() -> &'static Grid {
    static GRID: OnceLock<Grid> = OnceLock::new();
    GRID.get_or_init(|| {
        let mut grid: Grid = [[None; GRID_SIZE as usize]; GRID_SIZE as usize];
        for cell in topology::all_cells() {
            let coord = cell.coord();
            debug_assert!(grid[coord.y as usize][coord.x as usize].is_none(), "overlapping cell {coord}");
            grid[coord.y as usize][coord.x as usize] = Some(cell);
        }
        grid
    })
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.coord().fmt(f)
    }
}

impl std::str::FromStr for Cell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coord: Coord = s.parse()?;
        Cell::from_coord(coord).ok_or(ParseCellError::NotACell(coord))
    }
}

impl TryFrom<String> for Cell {
    type Error = ParseCellError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}
