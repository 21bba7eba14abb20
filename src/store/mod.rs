//! Storage seams.
//!
//! The engine never owns persistence; it talks to three narrow traits, one
//! per record kind. Methods take `&self` so one store can be shared by every
//! engine operation; implementations provide their own interior mutability.
//!
//! Listing methods return records in creation order. The legality
//! evaluator relies on this for the order of movable pawns.
//!
//! [`MemoryStorage`] implements all three and is what tests and the
//! `simulate` binary run against.

pub mod memory;

pub use memory::MemoryStorage;

use crate::board::Cell;
use crate::core::{GameId, PawnId, PlayerId, RoundId, StoreResult};
use crate::game::Game;
use crate::pawn::{Pawn, PawnName};
use crate::round::Round;

/// Pawn persistence.
pub trait PawnStore {
    /// Insert a new pawn. `Duplicate` if its id is already stored.
    fn create_pawn(&self, pawn: &Pawn) -> StoreResult<()>;

    /// Every pawn of a game.
    fn list_pawns(&self, game: GameId) -> StoreResult<Vec<Pawn>>;

    /// Pawns of one player in a game.
    fn list_pawns_by_owner(&self, game: GameId, player: PlayerId) -> StoreResult<Vec<Pawn>>;

    fn find_pawn_by_name(&self, game: GameId, name: PawnName) -> StoreResult<Option<Pawn>>;

    /// Pawns standing on `cell`. Several only for the centre or a pen.
    fn find_pawns_by_cell(&self, game: GameId, cell: Cell) -> StoreResult<Vec<Pawn>>;

    /// Overwrite a stored pawn. `Missing` if it was never created.
    fn update_pawn(&self, pawn: &Pawn) -> StoreResult<()>;

    /// Remove a pawn. Used to undo a creation. `Missing` if unknown.
    fn delete_pawn(&self, id: PawnId) -> StoreResult<()>;
}

/// Round persistence. Rounds are an append-only history per game.
pub trait RoundStore {
    fn create_round(&self, round: &Round) -> StoreResult<()>;

    fn find_round(&self, id: RoundId) -> StoreResult<Option<Round>>;

    /// Rounds of a game, oldest first.
    fn list_rounds(&self, game: GameId) -> StoreResult<Vec<Round>>;

    fn update_round(&self, round: &Round) -> StoreResult<()>;

    /// Remove a round, keeping the order of the rest. `Missing` if unknown.
    fn delete_round(&self, id: RoundId) -> StoreResult<()>;
}

/// Game persistence.
pub trait GameStore {
    fn create_game(&self, game: &Game) -> StoreResult<()>;

    fn find_game(&self, id: GameId) -> StoreResult<Option<Game>>;

    fn update_game(&self, game: &Game) -> StoreResult<()>;
}

/// Everything the engine needs from persistence.
pub trait Storage: PawnStore + RoundStore + GameStore {}

impl<T: PawnStore + RoundStore + GameStore> Storage for T {}
