//! In-memory storage.
//!
//! All three record kinds live in one table set behind a single `Mutex`:
//! - pawns by id, plus a per-game creation order list
//! - rounds as a per-game `im::Vector` history, plus an id index into it
//! - games by id
//!
//! ## Usage
//!
//! ```
//! use ludo_rules::game::Game;
//! use ludo_rules::store::{GameStore, MemoryStorage};
//!
//! let store = MemoryStorage::new();
//! let game = Game::new("lunch break");
//! store.create_game(&game).unwrap();
//!
//! assert_eq!(store.find_game(game.id).unwrap(), Some(game));
//! ```

use std::sync::{Mutex, MutexGuard};

use im::Vector;
use rustc_hash::FxHashMap;

use crate::board::Cell;
use crate::core::{GameId, PawnId, PlayerId, RoundId, StoreError, StoreResult};
use crate::game::Game;
use crate::pawn::{Pawn, PawnName};
use crate::round::Round;

use super::{GameStore, PawnStore, RoundStore};

#[derive(Clone, Debug, Default)]
struct Tables {
    pawns: FxHashMap<PawnId, Pawn>,
    /// Pawn ids per game, in creation order.
    pawn_order: FxHashMap<GameId, Vec<PawnId>>,
    rounds: FxHashMap<GameId, Vector<Round>>,
    /// Round id -> (game, position in that game's history).
    round_index: FxHashMap<RoundId, (GameId, usize)>,
    games: FxHashMap<GameId, Game>,
}

impl Tables {
    fn pawns_of(&self, game: GameId) -> impl Iterator<Item = &Pawn> + '_ {
        self.pawn_order
            .get(&game)
            .into_iter()
            .flatten()
            .filter_map(|id| self.pawns.get(id))
    }
}

/// Storage backed by hash maps, for tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl PawnStore for MemoryStorage {
    fn create_pawn(&self, pawn: &Pawn) -> StoreResult<()> {
        let mut tables = self.tables()?;
        if tables.pawns.contains_key(&pawn.id) {
            return Err(StoreError::Duplicate(format!("pawn {}", pawn.id)));
        }
        tables.pawns.insert(pawn.id, pawn.clone());
        tables.pawn_order.entry(pawn.game_id).or_default().push(pawn.id);
        Ok(())
    }

    fn list_pawns(&self, game: GameId) -> StoreResult<Vec<Pawn>> {
        Ok(self.tables()?.pawns_of(game).cloned().collect())
    }

    fn list_pawns_by_owner(&self, game: GameId, player: PlayerId) -> StoreResult<Vec<Pawn>> {
        Ok(self
            .tables()?
            .pawns_of(game)
            .filter(|p| p.player_id == player)
            .cloned()
            .collect())
    }

    fn find_pawn_by_name(&self, game: GameId, name: PawnName) -> StoreResult<Option<Pawn>> {
        Ok(self.tables()?.pawns_of(game).find(|p| p.name == name).cloned())
    }

    fn find_pawns_by_cell(&self, game: GameId, cell: Cell) -> StoreResult<Vec<Pawn>> {
        Ok(self
            .tables()?
            .pawns_of(game)
            .filter(|p| p.cell == cell)
            .cloned()
            .collect())
    }

    fn update_pawn(&self, pawn: &Pawn) -> StoreResult<()> {
        let mut tables = self.tables()?;
        let stored = tables
            .pawns
            .get_mut(&pawn.id)
            .ok_or_else(|| StoreError::Missing(format!("pawn {}", pawn.id)))?;
        *stored = pawn.clone();
        Ok(())
    }

    fn delete_pawn(&self, id: PawnId) -> StoreResult<()> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        let pawn = tables
            .pawns
            .remove(&id)
            .ok_or_else(|| StoreError::Missing(format!("pawn {id}")))?;
        if let Some(order) = tables.pawn_order.get_mut(&pawn.game_id) {
            order.retain(|other| *other != id);
        }
        Ok(())
    }
}

impl RoundStore for MemoryStorage {
    fn create_round(&self, round: &Round) -> StoreResult<()> {
        let mut tables = self.tables()?;
        if tables.round_index.contains_key(&round.id) {
            return Err(StoreError::Duplicate(format!("round {}", round.id)));
        }
        let history = tables.rounds.entry(round.game_id).or_default();
        let position = history.len();
        history.push_back(round.clone());
        tables.round_index.insert(round.id, (round.game_id, position));
        Ok(())
    }

    fn find_round(&self, id: RoundId) -> StoreResult<Option<Round>> {
        let tables = self.tables()?;
        Ok(tables
            .round_index
            .get(&id)
            .and_then(|(game, position)| tables.rounds.get(game)?.get(*position))
            .cloned())
    }

    fn list_rounds(&self, game: GameId) -> StoreResult<Vec<Round>> {
        Ok(self
            .tables()?
            .rounds
            .get(&game)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn update_round(&self, round: &Round) -> StoreResult<()> {
        let mut tables = self.tables()?;
        let missing = || StoreError::Missing(format!("round {}", round.id));
        let (game, position) = *tables.round_index.get(&round.id).ok_or_else(missing)?;
        let history = tables.rounds.get_mut(&game).ok_or_else(missing)?;
        history.set(position, round.clone());
        Ok(())
    }

    fn delete_round(&self, id: RoundId) -> StoreResult<()> {
        let mut guard = self.tables()?;
        let tables = &mut *guard;
        let missing = || StoreError::Missing(format!("round {id}"));
        let (game, position) = tables.round_index.remove(&id).ok_or_else(missing)?;
        let history = tables.rounds.get_mut(&game).ok_or_else(missing)?;
        history.remove(position);

        // Later rounds moved down by one.
        for (offset, round) in history.iter().enumerate().skip(position) {
            tables.round_index.insert(round.id, (game, offset));
        }
        Ok(())
    }
}

impl GameStore for MemoryStorage {
    fn create_game(&self, game: &Game) -> StoreResult<()> {
        let mut tables = self.tables()?;
        if tables.games.contains_key(&game.id) {
            return Err(StoreError::Duplicate(format!("game {}", game.id)));
        }
        tables.games.insert(game.id, game.clone());
        Ok(())
    }

    fn find_game(&self, id: GameId) -> StoreResult<Option<Game>> {
        Ok(self.tables()?.games.get(&id).cloned())
    }

    fn update_game(&self, game: &Game) -> StoreResult<()> {
        let mut tables = self.tables()?;
        let stored = tables
            .games
            .get_mut(&game.id)
            .ok_or_else(|| StoreError::Missing(format!("game {}", game.id)))?;
        *stored = game.clone();
        Ok(())
    }
}
