//! Game records: seating, colours and lifecycle timestamps.
//!
//! ## Seating
//!
//! Players join in order (`players`). Each seated player holds at most one
//! colour and each colour at most one player; the colour seating is what
//! drives the turn rotation, not the join order:
//!
//! ```
//! use ludo_rules::core::{Color, PlayerId};
//! use ludo_rules::game::Game;
//!
//! let mut game = Game::new("friday night");
//! let (alice, bob) = (PlayerId::new(), PlayerId::new());
//! game.seat_player(alice).unwrap();
//! game.seat_player(bob).unwrap();
//! game.select_color(bob, Color::Blue).unwrap();
//! game.select_color(alice, Color::Green).unwrap();
//!
//! assert_eq!(game.next_player_after(alice), Some(bob));
//! assert_eq!(game.next_player_after(bob), Some(alice));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Color, ColorMap, EngineError, EngineResult, GameId, PlayerId, COLOR_COUNT};

/// A game and its seating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    /// Seated players, in join order.
    players: Vec<PlayerId>,
    /// Which player sits on which colour.
    colors: ColorMap<Option<PlayerId>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub winner: Option<PlayerId>,
}

impl Game {
    /// Create an empty game.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GameId::new(),
            name: name.into(),
            players: Vec::new(),
            colors: ColorMap::default(),
            started_at: None,
            finished_at: None,
            winner: None,
        }
    }

    /// Seated players in join order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Colour seating.
    #[must_use]
    pub fn colors(&self) -> &ColorMap<Option<PlayerId>> {
        &self.colors
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    #[must_use]
    pub fn is_seated(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Seat a player. Seating twice is a no-op.
    ///
    /// ## Errors
    ///
    /// - `GameAlreadyStarted` once the game started
    /// - `InvalidPlayerCount` when all four colours are already seated
    pub fn seat_player(&mut self, player: PlayerId) -> EngineResult<()> {
        if self.is_started() {
            return Err(EngineError::GameAlreadyStarted(self.id));
        }
        if self.is_seated(player) {
            return Ok(());
        }
        if self.players.len() >= COLOR_COUNT {
            return Err(EngineError::InvalidPlayerCount {
                count: self.players.len() + 1,
                max: COLOR_COUNT,
            });
        }
        self.players.push(player);
        Ok(())
    }

    /// Colour held by a player.
    #[must_use]
    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        self.colors
            .iter()
            .find_map(|(color, seat)| (*seat == Some(player)).then_some(color))
    }

    /// Player sitting on a colour.
    #[must_use]
    pub fn player_on(&self, color: Color) -> Option<PlayerId> {
        self.colors[color]
    }

    /// Take a colour for a seated player, releasing the one they held.
    ///
    /// ## Errors
    ///
    /// - `GameAlreadyStarted` once the game started
    /// - `PlayerNotInGame` for a player that is not seated
    /// - `ColorAlreadyTaken` when another player holds `color`
    pub fn select_color(&mut self, player: PlayerId, color: Color) -> EngineResult<()> {
        if self.is_started() {
            return Err(EngineError::GameAlreadyStarted(self.id));
        }
        if !self.is_seated(player) {
            return Err(EngineError::PlayerNotInGame(player));
        }
        match self.colors[color] {
            Some(holder) if holder == player => return Ok(()),
            Some(_) => return Err(EngineError::ColorAlreadyTaken(color)),
            None => {}
        }
        if let Some(previous) = self.color_of(player) {
            self.colors[previous] = None;
        }
        self.colors[color] = Some(player);
        Ok(())
    }

    /// Give every player without a colour the first free one, in join order.
    /// Returns the assignments made.
    pub fn assign_free_colors(&mut self) -> Vec<(PlayerId, Color)> {
        let mut assigned = Vec::new();
        for player in self.players.clone() {
            if self.color_of(player).is_some() {
                continue;
            }
            let Some(free) = Color::ALL.into_iter().find(|&c| self.colors[c].is_none()) else {
                break;
            };
            self.colors[free] = Some(player);
            assigned.push((player, free));
        }
        assigned
    }

    /// Seated colours with their players, in turn order.
    #[must_use]
    pub fn turn_order(&self) -> Vec<(Color, PlayerId)> {
        self.colors
            .iter()
            .filter_map(|(color, seat)| seat.map(|player| (color, player)))
            .collect()
    }

    /// The player after `player` in colour order, skipping empty colours.
    ///
    /// With a single seated player this is the player itself. `None` when
    /// `player` holds no colour.
    #[must_use]
    pub fn next_player_after(&self, player: PlayerId) -> Option<PlayerId> {
        let mut color = self.color_of(player)?;
        for _ in 0..COLOR_COUNT {
            color = color.next();
            if let Some(next) = self.colors[color] {
                return Some(next);
            }
        }
        None
    }

    /// Stamp the start time.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
    }

    /// Stamp the finish time and record the winner.
    pub fn finish(&mut self, winner: PlayerId, now: DateTime<Utc>) {
        self.winner = Some(winner);
        self.finished_at = Some(now);
    }
}
