//! Player colours and per-colour data storage.
//!
//! ## Color
//!
//! The four colours are totally ordered: `Blue < Red < Green < Yellow`.
//! That order is both the concatenation order of the shared ring and the
//! order in which turns rotate.
//!
//! ## ColorMap
//!
//! Fixed-size per-colour storage backed by an array for O(1) access.
//! Supports iteration in colour order and indexing by `Color`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of colours (and therefore seats) on the board.
pub const COLOR_COUNT: usize = 4;

/// A player colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
    Green,
    Yellow,
}

impl Color {
    /// All colours in turn order.
    pub const ALL: [Color; COLOR_COUNT] = [Color::Blue, Color::Red, Color::Green, Color::Yellow];

    /// Position of this colour in turn order (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Blue => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
        }
    }

    /// Colour at a turn-order position, wrapping.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % COLOR_COUNT]
    }

    /// The colour that plays after this one.
    ///
    /// ```
    /// use ludo_rules::core::Color;
    ///
    /// assert_eq!(Color::Blue.next(), Color::Red);
    /// assert_eq!(Color::Yellow.next(), Color::Blue);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Canonical name, as used in pawn names and on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Blue => "Blue",
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown colour name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown color {0:?}")]
pub struct ParseColorError(pub String);

impl std::str::FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// Per-colour data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ludo_rules::core::{Color, ColorMap};
///
/// let mut seats: ColorMap<Option<&str>> = ColorMap::default();
/// seats[Color::Green] = Some("alice");
///
/// assert_eq!(seats[Color::Green], Some("alice"));
/// assert_eq!(seats[Color::Blue], None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; COLOR_COUNT],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: Color::ALL.map(factory),
        }
    }

    /// Get a reference to a colour's data.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a colour's data.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Color, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Color, &mut T)> {
        Color::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for ColorMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}
