//! Per-game mutual exclusion.
//!
//! Every engine operation holds its game's lock for the whole
//! read-decide-write sequence. Operations on different games never contend.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::core::{EngineError, EngineResult, GameId};

/// Registry of one lock per game, created on first use.
#[derive(Debug, Default)]
pub struct GameLocks {
    locks: Mutex<FxHashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock of a game. Callers lock the returned handle themselves, the
    /// registry itself is only held while looking it up.
    pub fn handle(&self, game: GameId) -> EngineResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| EngineError::invariant("game lock registry poisoned"))?;
        Ok(Arc::clone(locks.entry(game).or_default()))
    }

    /// Number of games seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.lock().map_or(0, |locks| locks.len())
    }
}
