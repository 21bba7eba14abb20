//! All-or-nothing execution of multi-write engine operations.
//!
//! A move touches several records: the round, the mover, any captured pawn,
//! the game and the next round. Each write made through a [`Transaction`]
//! records how to reverse it, and events are held back until the whole
//! operation succeeds.
//!
//! - `Ok`: the buffered events are published in order.
//! - `Err`: the recorded writes are reversed newest first and the events
//!   are dropped, so storage is left as the operation found it.
//!
//! A failed reversal is logged and skipped; the original error is what the
//! caller sees.

use tracing::{debug, warn};

use crate::core::{EngineResult, PawnId, RoundId, StoreResult};
use crate::events::{EngineEvent, EventSink};
use crate::game::Game;
use crate::pawn::Pawn;
use crate::round::Round;
use crate::store::Storage;

/// How to reverse one write.
#[derive(Debug)]
enum Undo {
    RestoreRound(Round),
    RestorePawn(Pawn),
    RestoreGame(Game),
    DeleteRound(RoundId),
    DeletePawn(PawnId),
}

/// Write log of one engine operation.
pub(crate) struct Transaction<'s, S: Storage> {
    store: &'s S,
    undo: Vec<Undo>,
    events: Vec<EngineEvent>,
}

impl<'s, S: Storage> Transaction<'s, S> {
    pub(crate) fn new(store: &'s S) -> Self {
        Self {
            store,
            undo: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Overwrite a round, remembering its previous state.
    pub(crate) fn update_round(&mut self, before: Round, after: &Round) -> StoreResult<()> {
        self.store.update_round(after)?;
        self.undo.push(Undo::RestoreRound(before));
        Ok(())
    }

    pub(crate) fn update_pawn(&mut self, before: Pawn, after: &Pawn) -> StoreResult<()> {
        self.store.update_pawn(after)?;
        self.undo.push(Undo::RestorePawn(before));
        Ok(())
    }

    pub(crate) fn update_game(&mut self, before: Game, after: &Game) -> StoreResult<()> {
        self.store.update_game(after)?;
        self.undo.push(Undo::RestoreGame(before));
        Ok(())
    }

    pub(crate) fn create_round(&mut self, round: &Round) -> StoreResult<()> {
        self.store.create_round(round)?;
        self.undo.push(Undo::DeleteRound(round.id));
        Ok(())
    }

    pub(crate) fn create_pawn(&mut self, pawn: &Pawn) -> StoreResult<()> {
        self.store.create_pawn(pawn)?;
        self.undo.push(Undo::DeletePawn(pawn.id));
        Ok(())
    }

    /// Queue an event for publication on success.
    pub(crate) fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    fn commit<E: EventSink>(self, sink: &E) {
        for event in self.events {
            sink.publish(event);
        }
    }

    fn rollback(self) {
        debug!(writes = self.undo.len(), "rolling back");
        for undo in self.undo.into_iter().rev() {
            let result = match &undo {
                Undo::RestoreRound(round) => self.store.update_round(round),
                Undo::RestorePawn(pawn) => self.store.update_pawn(pawn),
                Undo::RestoreGame(game) => self.store.update_game(game),
                Undo::DeleteRound(id) => self.store.delete_round(*id),
                Undo::DeletePawn(id) => self.store.delete_pawn(*id),
            };
            if let Err(err) = result {
                warn!(%err, ?undo, "rollback write failed");
            }
        }
    }
}

/// Run `op` as one unit: publish its events to `sink` when it succeeds,
/// reverse its writes when it fails.
pub(crate) fn run<S, E, T>(
    store: &S,
    sink: &E,
    op: impl FnOnce(&mut Transaction<'_, S>) -> EngineResult<T>,
) -> EngineResult<T>
where
    S: Storage,
    E: EventSink,
{
    let mut tx = Transaction::new(store);
    match op(&mut tx) {
        Ok(value) => {
            tx.commit(sink);
            Ok(value)
        }
        Err(err) => {
            warn!(%err, "operation failed, reverting its writes");
            tx.rollback();
            Err(err)
        }
    }
}
