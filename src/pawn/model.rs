//! Pawn records and pawn names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{Cell, PEN_SIZE};
use crate::core::{Color, GameId, PawnId, PlayerId};

/// Number of pawns each player owns.
pub const PAWNS_PER_PLAYER: usize = PEN_SIZE;

/// Name of a pawn: its colour and a number `1..=4`, rendered `"Blue.1"`.
///
/// Unique per colour within a game. The number fixes the pen slot the pawn
/// spawns into and returns to when captured.
///
/// ```
/// use ludo_rules::pawn::PawnName;
/// use ludo_rules::core::Color;
///
/// let name: PawnName = "Red.3".parse().unwrap();
/// assert_eq!(name, PawnName::new(Color::Red, 3).unwrap());
/// assert_eq!(name.pen_cell().to_string(), "13xx14");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PawnName {
    color: Color,
    number: u8,
}

/// Error returned for a malformed pawn name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid pawn name {0:?}, expected \"<Color>.<1-4>\"")]
pub struct ParsePawnNameError(pub String);

impl PawnName {
    /// Create a name. `None` unless `number` is in `1..=4`.
    #[must_use]
    pub fn new(color: Color, number: u8) -> Option<Self> {
        (1..=PAWNS_PER_PLAYER as u8)
            .contains(&number)
            .then_some(Self { color, number })
    }

    /// The four pawn names of a colour, in number order.
    pub fn all_for(color: Color) -> impl Iterator<Item = PawnName> {
        (1..=PAWNS_PER_PLAYER as u8).map(move |number| PawnName { color, number })
    }

    /// Colour part of the name.
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Number part of the name, `1..=4`.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    /// Pen cell this pawn spawns into.
    #[must_use]
    pub const fn pen_cell(self) -> Cell {
        Cell::Pen {
            color: self.color,
            slot: self.number - 1,
        }
    }
}

impl std::fmt::Display for PawnName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.color, self.number)
    }
}

impl std::str::FromStr for PawnName {
    type Err = ParsePawnNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePawnNameError(s.to_string());
        let (color, number) = s.split_once('.').ok_or_else(invalid)?;
        let color: Color = color.parse().map_err(|_| invalid())?;
        let number: u8 = number.parse().map_err(|_| invalid())?;
        PawnName::new(color, number).ok_or_else(invalid)
    }
}

impl TryFrom<String> for PawnName {
    type Error = ParsePawnNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PawnName> for String {
    fn from(name: PawnName) -> Self {
        name.to_string()
    }
}

/// A pawn on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub color: Color,
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub cell: Cell,
    pub name: PawnName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pawn {
    /// Create a pawn in its pen slot.
    #[must_use]
    pub fn spawn(game_id: GameId, player_id: PlayerId, name: PawnName, now: DateTime<Utc>) -> Self {
        Self {
            id: PawnId::new(),
            color: name.color(),
            game_id,
            player_id,
            cell: name.pen_cell(),
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this pawn moved to `cell` (builder pattern).
    #[must_use]
    pub fn at(mut self, cell: Cell) -> Self {
        self.cell = cell;
        self
    }

    /// Move this pawn, stamping the update time.
    pub fn relocate(&mut self, cell: Cell, now: DateTime<Utc>) {
        self.cell = cell;
        self.updated_at = now;
    }

    /// Check if the pawn is on the ring or a lane, i.e. in play.
    #[must_use]
    pub fn is_on_board(&self) -> bool {
        self.cell.is_road() || self.cell.is_lane()
    }

    /// Check if the pawn waits in its pen.
    #[must_use]
    pub fn is_in_pen(&self) -> bool {
        self.cell.is_pen()
    }

    /// Check if the pawn reached the centre.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.cell.is_center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert!(PawnName::new(Color::Blue, 0).is_none());
        assert!(PawnName::new(Color::Blue, 1).is_some());
        assert!(PawnName::new(Color::Blue, 4).is_some());
        assert!(PawnName::new(Color::Blue, 5).is_none());
    }

    #[test]
    fn test_name_parse() {
        assert_eq!("Green.2".parse::<PawnName>().unwrap().to_string(), "Green.2");
        assert!("Green.7".parse::<PawnName>().is_err());
        assert!("Green".parse::<PawnName>().is_err());
        assert!("Pink.1".parse::<PawnName>().is_err());
    }

    #[test]
    fn test_pen_cells_follow_names() {
        let cells: Vec<_> = PawnName::all_for(Color::Yellow)
            .map(|n| n.pen_cell().to_string())
            .collect();
        assert_eq!(cells, vec!["0xx0", "0xx1", "1xx0", "1xx1"]);
        assert_eq!(PawnName::new(Color::Green, 2).unwrap().pen_cell().to_string(), "14xx0");
    }

    #[test]
    fn test_spawn_and_relocate() {
        let now = Utc::now();
        let name = PawnName::new(Color::Blue, 1).unwrap();
        let mut pawn = Pawn::spawn(GameId::new(), PlayerId::new(), name, now);

        assert!(pawn.is_in_pen());
        assert_eq!(pawn.cell.to_string(), "0xx14");

        pawn.relocate(Cell::Road(1), now);
        assert!(pawn.is_on_board());
        assert!(!pawn.is_home());
    }

    #[test]
    fn test_pawn_serializes_cells_as_coordinates() {
        let name = PawnName::new(Color::Red, 1).unwrap();
        let pawn = Pawn::spawn(GameId::new(), PlayerId::new(), name, Utc::now());
        let json = serde_json::to_value(&pawn).unwrap();

        assert_eq!(json["cell"], "13xx13");
        assert_eq!(json["name"], "Red.1");
        assert_eq!(json["color"], "Red");
    }
}
