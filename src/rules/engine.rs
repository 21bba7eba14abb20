//! The rules engine: turn operations over a storage backend.
//!
//! `Engine` ties the pure pieces together:
//! - [`Round::roll`] for dice launches
//! - [`evaluate`] for the legal options, with auto-advance when the player
//!   can do nothing
//! - the move committer (validation, round close, relocation, capture, win
//!   detection, hand-off)
//! - the lifecycle hooks (colour selection, game start)
//!
//! ## Turn flow
//!
//! ```
//! use ludo_rules::core::{EngineConfig, PlayerId};
//! use ludo_rules::game::Game;
//! use ludo_rules::rules::Engine;
//! use ludo_rules::store::{GameStore, MemoryStorage};
//!
//! let engine = Engine::new(MemoryStorage::new()).with_config(EngineConfig::new().with_dice_seed(7));
//!
//! let player = PlayerId::new();
//! let mut game = Game::new("solo");
//! game.seat_player(player).unwrap();
//! engine.store().create_game(&game).unwrap();
//!
//! let round = engine.start_game(game.id).unwrap();
//! let round = engine.roll_dice(game.id, player, round.id).unwrap();
//! let options = engine.evaluate_options(game.id, player, round.id).unwrap();
//!
//! if let Some(choice) = options.movable_pawns.first() {
//!     engine
//!         .commit_move(game.id, player, round.id, choice.name, choice.source, choice.destination)
//!         .unwrap();
//! }
//! assert!(engine.current_round(game.id).unwrap().is_some());
//! ```
//!
//! ## Concurrency and failures
//!
//! Each operation holds its game's lock from the first read to the last
//! write, so two commits on the same round serialise and the second one
//! finds the round closed.
//!
//! Operations writing more than one record run inside a transaction: a
//! store failure halfway reverts the earlier writes and publishes nothing,
//! so the game keeps exactly one open round and the call can be retried.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::board::Cell;
use crate::core::{
    Color, DiceRng, EngineConfig, EngineError, EngineResult, GameId, PlayerId, RoundId, TechnicalFault,
};
use crate::events::{EngineEvent, EventSink, NullSink};
use crate::game::Game;
use crate::pawn::{Pawn, PawnName, PAWNS_PER_PLAYER};
use crate::round::{next_actor, MoveDescriptor, NextActor, Round};
use crate::store::Storage;

use super::legality::{evaluate, TurnOptions};
use super::locks::GameLocks;
use super::transaction::{self, Transaction};

/// Summary of a game, for end-of-game screens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndStats {
    /// Rounds played so far, the open one included.
    pub round_count: usize,
    pub winner: Option<PlayerId>,
}

/// Rules engine over a storage backend `S`, publishing to `E`.
pub struct Engine<S: Storage, E: EventSink = NullSink> {
    store: S,
    events: E,
    config: EngineConfig,
    rng: Mutex<DiceRng>,
    locks: GameLocks,
}

impl<S: Storage> Engine<S> {
    /// Create an engine with the default configuration and no event sink.
    #[must_use]
    pub fn new(store: S) -> Self {
        let config = EngineConfig::default();
        Self {
            store,
            events: NullSink,
            rng: Mutex::new(DiceRng::from_seed_option(config.dice_seed)),
            config,
            locks: GameLocks::new(),
        }
    }
}

impl<S: Storage, E: EventSink> Engine<S, E> {
    /// Replace the configuration, reseeding the dice (builder pattern).
    #[must_use]
    pub fn with_config(self, config: EngineConfig) -> Self {
        Self {
            rng: Mutex::new(DiceRng::from_seed_option(config.dice_seed)),
            config,
            ..self
        }
    }

    /// Publish events to `events` (builder pattern).
    #[must_use]
    pub fn with_events<E2: EventSink>(self, events: E2) -> Engine<S, E2> {
        Engine {
            store: self.store,
            events,
            config: self.config,
            rng: self.rng,
            locks: self.locks,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Turn operations ===

    /// Launch the dice of an open round.
    ///
    /// ## Errors
    ///
    /// - `RoundNotFound` for an unknown round or one of another game
    /// - `NotYourTurn` when `player` does not own the round
    /// - `DiceAlreadyLaunched` when the round already has a value
    /// - `TechnicalFault::RoundAlreadyClosed` for a closed round
    #[instrument(skip_all, fields(game = %game_id, player = %player, round = %round_id))]
    pub fn roll_dice(&self, game_id: GameId, player: PlayerId, round_id: RoundId) -> EngineResult<Round> {
        let lock = self.locks.handle(game_id)?;
        let _guard = acquire(&lock)?;

        let mut round = self.load_round(game_id, round_id)?;
        let dice = round.roll(player, &mut *self.dice()?, Utc::now())?;
        self.store.update_round(&round)?;
        debug!(dice, "dice launched");

        self.events.publish(EngineEvent::DiceLaunched {
            game_id,
            round_id,
            player_id: player,
            dice,
        });
        Ok(round)
    }

    /// Legal options for the player of a rolled round.
    ///
    /// When the player can do nothing with the roll the round is closed on
    /// the spot and the next round is opened: for the same player after a 6,
    /// for the next seated player otherwise.
    ///
    /// ## Errors
    ///
    /// - `RoundNotFound`, `NotYourTurn`, `DiceNotLaunched`
    /// - `TechnicalFault::RoundAlreadyClosed` for a closed round
    #[instrument(skip_all, fields(game = %game_id, player = %player, round = %round_id))]
    pub fn evaluate_options(
        &self,
        game_id: GameId,
        player: PlayerId,
        round_id: RoundId,
    ) -> EngineResult<TurnOptions> {
        let lock = self.locks.handle(game_id)?;
        let _guard = acquire(&lock)?;

        let mut round = self.load_round(game_id, round_id)?;
        if round.player_id != player {
            return Err(EngineError::NotYourTurn);
        }
        if !round.is_open() {
            return Err(TechnicalFault::RoundAlreadyClosed(round_id).into());
        }

        let pawns = self.store.list_pawns(game_id)?;
        let options = evaluate(&round, &pawns)?;
        debug!(
            movable = options.movable_pawns.len(),
            extra_turn = options.extra_turn,
            pen = options.can_enter_from_pen,
            "options evaluated"
        );

        if let Some(actor) = options.forfeit() {
            let game = self.load_game(game_id)?;
            let next = transaction::run(&self.store, &self.events, |tx| {
                let before = round.clone();
                round.close(None, Utc::now())?;
                tx.update_round(before, &round)?;
                self.open_next_round(tx, &game, round.player_id, actor)
            })?;
            info!(next_player = %next.player_id, ?actor, "nothing to move, round skipped");
        }
        Ok(options)
    }

    /// Commit a move for a rolled round and hand the turn over.
    ///
    /// Returns the closed round. A winning move finishes the game and opens
    /// no further round.
    ///
    /// ## Errors
    ///
    /// - `RoundNotFound`, `NotYourTurn`, `DiceNotLaunched`, `PawnNotFound`
    /// - `IllegalMove` when `strict_moves` is on and the move was not offered
    /// - `TechnicalFault` when the round is already closed or the store
    ///   fails; a store failure reverts every write already made
    #[instrument(skip_all, fields(game = %game_id, player = %player, round = %round_id, pawn = %pawn_name))]
    pub fn commit_move(
        &self,
        game_id: GameId,
        player: PlayerId,
        round_id: RoundId,
        pawn_name: PawnName,
        from: Cell,
        to: Cell,
    ) -> EngineResult<Round> {
        let lock = self.locks.handle(game_id)?;
        let _guard = acquire(&lock)?;

        let mut round = self.load_round(game_id, round_id)?;
        if round.player_id != player {
            return Err(EngineError::NotYourTurn);
        }
        let dice = round.dice_value()?;

        let pawns = self.store.list_pawns(game_id)?;
        if self.config.strict_moves && round.is_open() {
            let options = evaluate(&round, &pawns)?;
            if !options.allows(pawn_name, from, to) {
                warn!(%from, %to, "move not offered");
                return Err(EngineError::IllegalMove { pawn: pawn_name, from, to });
            }
        }
        let pawn = pawns
            .into_iter()
            .find(|p| p.name == pawn_name)
            .ok_or(EngineError::PawnNotFound(pawn_name))?;
        let mut game = self.load_game(game_id)?;

        transaction::run(&self.store, &self.events, |tx| {
            let now = Utc::now();
            let before = round.clone();
            round.close(Some(MoveDescriptor::new(pawn_name, from, to)), now)?;
            tx.update_round(before, &round)?;

            let mut moved = pawn.clone();
            moved.relocate(to, now);
            tx.update_pawn(pawn, &moved)?;
            debug!(%from, %to, "pawn moved");
            tx.emit(EngineEvent::PawnMoved {
                game_id,
                round_id,
                pawn: pawn_name,
                from,
                to,
            });

            self.capture_on(tx, &moved)?;

            if self.has_won(game_id, player)? {
                let before = game.clone();
                game.finish(player, now);
                tx.update_game(before, &game)?;
                info!(winner = %player, "game finished");
                tx.emit(EngineEvent::GameFinished { game_id, winner: player });
                return Ok(round);
            }

            self.open_next_round(tx, &game, player, next_actor(dice))?;
            Ok(round)
        })
    }

    // === Lifecycle ===

    /// Take a colour for a seated player before the game starts.
    ///
    /// ## Errors
    ///
    /// `GameNotFound`, `GameAlreadyStarted`, `PlayerNotInGame`,
    /// `ColorAlreadyTaken`.
    #[instrument(skip_all, fields(game = %game_id, player = %player, %color))]
    pub fn select_color(&self, game_id: GameId, player: PlayerId, color: Color) -> EngineResult<Game> {
        let lock = self.locks.handle(game_id)?;
        let _guard = acquire(&lock)?;

        let mut game = self.load_game(game_id)?;
        game.select_color(player, color)?;
        self.store.update_game(&game)?;

        self.events.publish(EngineEvent::PlayerColorSelected {
            game_id,
            player_id: player,
            color,
        });
        Ok(game)
    }

    /// Start a game: settle colours, spawn every pawn into its pen and open
    /// the first round for the first player who joined.
    ///
    /// ## Errors
    ///
    /// `GameNotFound`, `GameAlreadyStarted`, `InvalidPlayerCount`.
    #[instrument(skip_all, fields(game = %game_id))]
    pub fn start_game(&self, game_id: GameId) -> EngineResult<Round> {
        let lock = self.locks.handle(game_id)?;
        let _guard = acquire(&lock)?;

        let mut game = self.load_game(game_id)?;
        let before = game.clone();
        if game.is_started() {
            return Err(EngineError::GameAlreadyStarted(game_id));
        }
        let count = game.players().len();
        if count == 0 || count > self.config.max_players {
            return Err(EngineError::InvalidPlayerCount {
                count,
                max: self.config.max_players,
            });
        }

        for (player, color) in game.assign_free_colors() {
            debug!(%player, %color, "colour assigned");
        }

        transaction::run(&self.store, &self.events, |tx| {
            let now = Utc::now();
            for (color, player) in game.turn_order() {
                for name in PawnName::all_for(color) {
                    tx.create_pawn(&Pawn::spawn(game_id, player, name, now))?;
                }
            }

            let first_player = game.players()[0];
            let round = Round::new(game_id, first_player, now);
            tx.create_round(&round)?;

            game.start(now);
            tx.update_game(before, &game)?;
            info!(players = count, first = %first_player, "game started");

            tx.emit(EngineEvent::GameStarted {
                game_id,
                round_id: round.id,
                first_player,
            });
            Ok(round)
        })
    }

    // === Queries ===

    /// The open round of a game, if any.
    pub fn current_round(&self, game_id: GameId) -> EngineResult<Option<Round>> {
        Ok(self
            .store
            .list_rounds(game_id)?
            .into_iter()
            .rev()
            .find(Round::is_open))
    }

    /// Every pawn of a game.
    pub fn pawns(&self, game_id: GameId) -> EngineResult<Vec<Pawn>> {
        Ok(self.store.list_pawns(game_id)?)
    }

    /// The pawn standing on a cell. For shared cells holding several pawns
    /// (the centre) the first one found.
    pub fn pawn_on_cell(&self, game_id: GameId, cell: Cell) -> EngineResult<Option<Pawn>> {
        Ok(self.store.find_pawns_by_cell(game_id, cell)?.into_iter().next())
    }

    /// Round count and winner of a game.
    pub fn end_stats(&self, game_id: GameId) -> EngineResult<EndStats> {
        let game = self.load_game(game_id)?;
        Ok(EndStats {
            round_count: self.store.list_rounds(game_id)?.len(),
            winner: game.winner,
        })
    }

    // === Internals ===

    fn dice(&self) -> EngineResult<MutexGuard<'_, DiceRng>> {
        self.rng.lock().map_err(|_| EngineError::invariant("dice lock poisoned"))
    }

    fn load_round(&self, game_id: GameId, round_id: RoundId) -> EngineResult<Round> {
        self.store
            .find_round(round_id)?
            .filter(|round| round.game_id == game_id)
            .ok_or(EngineError::RoundNotFound(round_id))
    }

    fn load_game(&self, game_id: GameId) -> EngineResult<Game> {
        self.store.find_game(game_id)?.ok_or(EngineError::GameNotFound(game_id))
    }

    /// Send every opponent pawn on the mover's ring cell back to its pen.
    fn capture_on(&self, tx: &mut Transaction<'_, S>, mover: &Pawn) -> EngineResult<()> {
        if !mover.cell.is_road() {
            return Ok(());
        }
        let victims = self.store.find_pawns_by_cell(mover.game_id, mover.cell)?;
        for victim in victims.into_iter().filter(|p| p.player_id != mover.player_id) {
            let captured_on = victim.cell;
            let pen = victim.name.pen_cell();
            let mut returned = victim.clone();
            returned.relocate(pen, mover.updated_at);
            tx.update_pawn(victim, &returned)?;
            info!(victim = %returned.name, cell = %captured_on, "pawn captured");

            tx.emit(EngineEvent::PawnCaptured {
                game_id: mover.game_id,
                pawn: returned.name,
                captured_on,
                cell: pen,
            });
        }
        Ok(())
    }

    fn has_won(&self, game_id: GameId, player: PlayerId) -> EngineResult<bool> {
        let own = self.store.list_pawns_by_owner(game_id, player)?;
        Ok(own.iter().filter(|p| p.is_home()).count() == PAWNS_PER_PLAYER)
    }

    fn open_next_round(
        &self,
        tx: &mut Transaction<'_, S>,
        game: &Game,
        previous: PlayerId,
        actor: NextActor,
    ) -> EngineResult<Round> {
        let player = match actor {
            NextActor::SamePlayer => previous,
            NextActor::NextPlayer => game
                .next_player_after(previous)
                .ok_or_else(|| EngineError::invariant(format!("player {previous} holds no colour")))?,
        };
        let round = Round::new(game.id, player, Utc::now());
        tx.create_round(&round)?;
        debug!(next = %player, ?actor, "round created");

        tx.emit(EngineEvent::RoundCreated {
            game_id: game.id,
            round_id: round.id,
            player_id: player,
        });
        Ok(round)
    }
}

fn acquire(lock: &Mutex<()>) -> EngineResult<MutexGuard<'_, ()>> {
    lock.lock().map_err(|_| EngineError::invariant("game lock poisoned"))
}

impl<S: Storage, E: EventSink> std::fmt::Debug for Engine<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("games", &self.locks.len())
            .finish_non_exhaustive()
    }
}
