//! Engine integration tests.
//!
//! Full turns against `MemoryStorage`: captures, wins, skipped rounds,
//! concurrent commits and storage failures.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use ludo_rules::board::Cell;
use ludo_rules::core::{
    Color, EngineConfig, EngineError, GameId, PawnId, PlayerId, RoundId, StoreError, StoreResult, TechnicalFault,
};
use ludo_rules::events::{EngineEvent, RecordingSink};
use ludo_rules::game::Game;
use ludo_rules::pawn::{Pawn, PawnName};
use ludo_rules::round::{Round, RoundStatus};
use ludo_rules::rules::Engine;
use ludo_rules::store::{GameStore, MemoryStorage, PawnStore, RoundStore, Storage};

struct Table<S: Storage> {
    engine: Engine<S, Arc<RecordingSink>>,
    events: Arc<RecordingSink>,
    game: GameId,
    players: Vec<PlayerId>,
}

impl Table<MemoryStorage> {
    fn new(players: usize) -> Self {
        Self::with_store(MemoryStorage::new(), players)
    }
}

impl<S: Storage> Table<S> {
    /// Seat `players` players (Blue, Red, Green, Yellow in order) and start.
    fn with_store(store: S, players: usize) -> Self {
        let events = Arc::new(RecordingSink::new());
        let engine = Engine::new(store)
            .with_config(EngineConfig::new().with_dice_seed(11))
            .with_events(Arc::clone(&events));

        let mut game = Game::new("table");
        let ids: Vec<_> = (0..players).map(|_| PlayerId::new()).collect();
        for &id in &ids {
            game.seat_player(id).unwrap();
        }
        engine.store().create_game(&game).unwrap();
        engine.start_game(game.id).unwrap();
        events.take();

        Self {
            engine,
            events,
            game: game.id,
            players: ids,
        }
    }

    fn player(&self, color: Color) -> PlayerId {
        self.players[color.index()]
    }

    fn pawn(&self, name: &str) -> Pawn {
        self.engine
            .store()
            .find_pawn_by_name(self.game, name.parse().unwrap())
            .unwrap()
            .unwrap()
    }

    fn place(&self, name: &str, cell: &str) {
        let mut pawn = self.pawn(name);
        pawn.relocate(cell.parse().unwrap(), Utc::now());
        self.engine.store().update_pawn(&pawn).unwrap();
    }

    /// Replace the open round with a rolled one for `color`.
    fn rolled(&self, color: Color, dice: u8) -> Round {
        let mut open = self.engine.current_round(self.game).unwrap().unwrap();
        open.close(None, Utc::now()).unwrap();
        self.engine.store().update_round(&open).unwrap();

        let mut round = Round::new(self.game, self.player(color), Utc::now());
        round.dice = Some(dice);
        round.status = RoundStatus::AwaitingMove;
        self.engine.store().create_round(&round).unwrap();
        round
    }

    fn commit(&self, color: Color, round: RoundId, name: &str, from: &str, to: &str) -> Result<Round, EngineError> {
        self.engine.commit_move(
            self.game,
            self.player(color),
            round,
            name.parse().unwrap(),
            from.parse().unwrap(),
            to.parse().unwrap(),
        )
    }

    fn open_round(&self) -> Option<Round> {
        self.engine.current_round(self.game).unwrap()
    }
}

/// Starting seats every pawn in its pen and gives the first joiner the first round.
#[test]
fn test_start_game() {
    let table = Table::new(3);
    let pawns = table.engine.pawns(table.game).unwrap();

    assert_eq!(pawns.len(), 12);
    for pawn in &pawns {
        assert_eq!(pawn.cell, pawn.name.pen_cell());
    }
    assert!(pawns.iter().all(|p| p.color != Color::Yellow));
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Blue));

    let game = table.engine.store().find_game(table.game).unwrap().unwrap();
    assert!(game.is_started());
}

/// A full turn through the engine emits the expected events.
#[test]
fn test_full_turn_events() {
    let table = Table::new(2);
    let blue = table.player(Color::Blue);
    let round = table.open_round().unwrap();

    let rolled = table.engine.roll_dice(table.game, blue, round.id).unwrap();
    let options = table.engine.evaluate_options(table.game, blue, round.id).unwrap();

    if rolled.dice == Some(6) {
        assert_eq!(options.movable_pawns.len(), 4);
        let choice = options.movable_pawns[0];
        table
            .engine
            .commit_move(table.game, blue, round.id, choice.name, choice.source, choice.destination)
            .unwrap();
        assert_eq!(table.events.names(), vec!["dice-launched", "pawn-moved", "round-created"]);
        assert_eq!(table.open_round().unwrap().player_id, blue);
    } else {
        assert!(options.movable_pawns.is_empty());
        assert_eq!(table.events.names(), vec!["dice-launched", "round-created"]);
        assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Red));
    }
}

/// Leaving the pen onto an opponent standing on the entry cell captures it.
#[test]
fn test_pen_exit_captures_on_entry_cell() {
    let table = Table::new(2);
    table.place("Red.1", "0xx8");
    let round = table.rolled(Color::Blue, 6);

    table.commit(Color::Blue, round.id, "Blue.1", "0xx14", "0xx8").unwrap();

    assert_eq!(table.pawn("Blue.1").cell.to_string(), "0xx8");
    assert_eq!(table.pawn("Red.1").cell, PawnName::new(Color::Red, 1).unwrap().pen_cell());
    assert_eq!(table.pawn("Red.1").cell.to_string(), "13xx13");
    assert_eq!(table.events.names(), vec!["pawn-moved", "traycase-updated", "round-created"]);

    let captured = table.events.events().into_iter().find_map(|e| match e {
        EngineEvent::PawnCaptured { pawn, captured_on, cell, .. } => Some((pawn, captured_on, cell)),
        _ => None,
    });
    assert_eq!(
        captured,
        Some((
            "Red.1".parse().unwrap(),
            "0xx8".parse().unwrap(),
            "13xx13".parse().unwrap()
        ))
    );
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Blue));
}

/// Landing on an opponent sends it back to the pen slot matching its name.
#[test]
fn test_capture_returns_victim_to_pen() {
    let table = Table::new(2);
    table.place("Blue.1", "0xx8");
    table.place("Red.3", "3xx8");
    let round = table.rolled(Color::Blue, 3);

    table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "3xx8").unwrap();

    assert_eq!(table.pawn("Blue.1").cell.to_string(), "3xx8");
    assert_eq!(table.pawn("Red.3").cell.to_string(), "13xx14");
    assert_eq!(table.events.names(), vec!["pawn-moved", "traycase-updated", "round-created"]);

    let captured = table.events.events().into_iter().find_map(|e| match e {
        EngineEvent::PawnCaptured { pawn, captured_on, cell, .. } => Some((pawn, captured_on, cell)),
        _ => None,
    });
    assert_eq!(
        captured,
        Some((
            "Red.3".parse().unwrap(),
            "3xx8".parse().unwrap(),
            "13xx14".parse().unwrap()
        ))
    );
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Red));
}

/// Own pawns on the destination are never captured.
#[test]
fn test_no_capture_of_own_pawn() {
    let table = Table::new(2);
    table.place("Blue.1", "0xx8");
    table.place("Blue.2", "3xx8");
    let round = table.rolled(Color::Blue, 3);

    table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "3xx8").unwrap();
    assert_eq!(table.pawn("Blue.2").cell.to_string(), "3xx8");
    assert!(!table.events.names().contains(&"traycase-updated"));
}

/// The centre is shared and never captures.
#[test]
fn test_center_does_not_capture() {
    let table = Table::new(2);
    table.place("Red.1", "7xx7");
    table.place("Blue.1", "6xx7");
    let round = table.rolled(Color::Blue, 6);

    table.commit(Color::Blue, round.id, "Blue.1", "6xx7", "7xx7").unwrap();
    assert_eq!(table.pawn("Red.1").cell, Cell::Center);
    assert_eq!(table.pawn("Blue.1").cell, Cell::Center);
}

/// Bringing the fourth pawn home wins and opens no further round.
#[test]
fn test_fourth_pawn_home_wins() {
    let table = Table::new(2);
    for name in ["Blue.1", "Blue.2", "Blue.3"] {
        table.place(name, "7xx7");
    }
    table.place("Blue.4", "6xx7");
    let round = table.rolled(Color::Blue, 6);

    let closed = table.commit(Color::Blue, round.id, "Blue.4", "6xx7", "7xx7").unwrap();
    assert_eq!(closed.status, RoundStatus::Closed);
    assert!(table.open_round().is_none());

    let game = table.engine.store().find_game(table.game).unwrap().unwrap();
    assert_eq!(game.winner, Some(table.player(Color::Blue)));
    assert!(game.is_finished());
    assert_eq!(table.events.names(), vec!["pawn-moved", "game-finished"]);

    let stats = table.engine.end_stats(table.game).unwrap();
    assert_eq!(stats.winner, Some(table.player(Color::Blue)));
    assert_eq!(stats.round_count, 2);
}

/// Three pawns home is not a win.
#[test]
fn test_three_home_keeps_playing() {
    let table = Table::new(2);
    table.place("Blue.1", "7xx7");
    table.place("Blue.2", "7xx7");
    table.place("Blue.4", "6xx7");
    let round = table.rolled(Color::Blue, 6);

    table.commit(Color::Blue, round.id, "Blue.4", "6xx7", "7xx7").unwrap();
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Blue));
}

/// Nothing to move: the round closes and the next player gets a round.
#[test]
fn test_forfeit_passes_turn() {
    let table = Table::new(3);
    let round = table.rolled(Color::Blue, 2);

    let options = table
        .engine
        .evaluate_options(table.game, table.player(Color::Blue), round.id)
        .unwrap();
    assert!(options.movable_pawns.is_empty());

    let stored = table.engine.store().find_round(round.id).unwrap().unwrap();
    assert_eq!(stored.status, RoundStatus::Closed);
    assert_eq!(stored.chosen_move, None);
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Red));
}

/// Nothing to move on a 6: the same player plays again.
#[test]
fn test_forfeit_on_six_replays() {
    let table = Table::new(2);
    table.place("Blue.1", "0xx7");
    for name in ["Blue.2", "Blue.3", "Blue.4"] {
        table.place(name, "7xx7");
    }
    let round = table.rolled(Color::Blue, 6);

    table
        .engine
        .evaluate_options(table.game, table.player(Color::Blue), round.id)
        .unwrap();
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Blue));
}

/// The last seated colour hands over to the first.
#[test]
fn test_turn_wraps_to_first_color() {
    let table = Table::new(2);
    table.place("Red.1", "8xx14");
    let round = table.rolled(Color::Red, 2);

    table.commit(Color::Red, round.id, "Red.1", "8xx14", "8xx12").unwrap();
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Blue));
}

/// Rule violations leave the round untouched.
#[test]
fn test_rule_violations() {
    let table = Table::new(2);
    let round = table.rolled(Color::Blue, 6);

    let wrong_player = table.commit(Color::Red, round.id, "Red.1", "13xx13", "8xx14");
    assert_eq!(wrong_player, Err(EngineError::NotYourTurn));

    let unknown = table.commit(Color::Blue, round.id, "Yellow.1", "0xx0", "6xx0");
    assert_eq!(unknown, Err(EngineError::PawnNotFound("Yellow.1".parse().unwrap())));

    let missing = table.commit(Color::Blue, RoundId::new(), "Blue.1", "0xx14", "0xx8");
    assert!(matches!(missing, Err(EngineError::RoundNotFound(_))));

    assert!(table.engine.store().find_round(round.id).unwrap().unwrap().is_open());
}

/// Committing a closed round is a technical fault, not a rule violation.
#[test]
fn test_commit_twice() {
    let table = Table::new(2);
    let round = table.rolled(Color::Blue, 6);

    table.commit(Color::Blue, round.id, "Blue.1", "0xx14", "0xx8").unwrap();
    let again = table.commit(Color::Blue, round.id, "Blue.2", "0xx13", "0xx8");

    assert_eq!(again, Err(TechnicalFault::RoundAlreadyClosed(round.id).into()));
    assert!(!again.unwrap_err().is_rule_violation());
    assert_eq!(table.pawn("Blue.2").cell, PawnName::new(Color::Blue, 2).unwrap().pen_cell());
}

/// Two threads committing the same round: exactly one wins.
#[test]
fn test_concurrent_commits() {
    let table = Table::new(2);
    table.place("Blue.1", "0xx8");
    let round = table.rolled(Color::Blue, 3);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| scope.spawn(|| table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "3xx8")))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let failure = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(failure, TechnicalFault::RoundAlreadyClosed(round.id).into());

    let rounds = table.engine.store().list_rounds(table.game).unwrap();
    assert_eq!(rounds.iter().filter(|r| r.is_open()).count(), 1);
}

/// Store wrapper failing pen writes of one pawn, and new rounds on demand.
struct FailingStore {
    inner: MemoryStorage,
    poisoned: Option<PawnName>,
    refuse_rounds: AtomicBool,
}

impl FailingStore {
    fn new(poisoned: Option<&str>) -> Self {
        Self {
            inner: MemoryStorage::new(),
            poisoned: poisoned.map(|name| name.parse().unwrap()),
            refuse_rounds: AtomicBool::new(false),
        }
    }

    fn offline() -> StoreError {
        StoreError::Unavailable("table offline".into())
    }
}

impl PawnStore for FailingStore {
    fn create_pawn(&self, pawn: &Pawn) -> StoreResult<()> {
        self.inner.create_pawn(pawn)
    }

    fn list_pawns(&self, game: GameId) -> StoreResult<Vec<Pawn>> {
        self.inner.list_pawns(game)
    }

    fn list_pawns_by_owner(&self, game: GameId, player: PlayerId) -> StoreResult<Vec<Pawn>> {
        self.inner.list_pawns_by_owner(game, player)
    }

    fn find_pawn_by_name(&self, game: GameId, name: PawnName) -> StoreResult<Option<Pawn>> {
        self.inner.find_pawn_by_name(game, name)
    }

    fn find_pawns_by_cell(&self, game: GameId, cell: Cell) -> StoreResult<Vec<Pawn>> {
        self.inner.find_pawns_by_cell(game, cell)
    }

    fn update_pawn(&self, pawn: &Pawn) -> StoreResult<()> {
        if self.poisoned == Some(pawn.name) && pawn.is_in_pen() {
            return Err(Self::offline());
        }
        self.inner.update_pawn(pawn)
    }

    fn delete_pawn(&self, id: PawnId) -> StoreResult<()> {
        self.inner.delete_pawn(id)
    }
}

impl RoundStore for FailingStore {
    fn create_round(&self, round: &Round) -> StoreResult<()> {
        if self.refuse_rounds.load(Ordering::SeqCst) {
            return Err(Self::offline());
        }
        self.inner.create_round(round)
    }

    fn find_round(&self, id: RoundId) -> StoreResult<Option<Round>> {
        self.inner.find_round(id)
    }

    fn list_rounds(&self, game: GameId) -> StoreResult<Vec<Round>> {
        self.inner.list_rounds(game)
    }

    fn update_round(&self, round: &Round) -> StoreResult<()> {
        self.inner.update_round(round)
    }

    fn delete_round(&self, id: RoundId) -> StoreResult<()> {
        self.inner.delete_round(id)
    }
}

impl GameStore for FailingStore {
    fn create_game(&self, game: &Game) -> StoreResult<()> {
        self.inner.create_game(game)
    }

    fn find_game(&self, id: GameId) -> StoreResult<Option<Game>> {
        self.inner.find_game(id)
    }

    fn update_game(&self, game: &Game) -> StoreResult<()> {
        self.inner.update_game(game)
    }
}

fn offline_fault() -> Result<Round, EngineError> {
    Err(EngineError::Technical(TechnicalFault::Store(FailingStore::offline())))
}

/// A failing capture write reverts the whole move; the round can be replayed.
#[test]
fn test_failed_capture_reverts_move() {
    let table = Table::with_store(FailingStore::new(Some("Red.1")), 2);
    table.place("Blue.1", "0xx8");
    table.place("Red.1", "2xx8");
    let round = table.rolled(Color::Blue, 2);

    let result = table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "2xx8");
    assert_eq!(result, offline_fault());

    let open = table.open_round().unwrap();
    assert_eq!(open.id, round.id);
    assert_eq!(open.dice, Some(2));
    assert_eq!(open.status, RoundStatus::AwaitingMove);
    assert_eq!(table.pawn("Blue.1").cell.to_string(), "0xx8");
    assert_eq!(table.pawn("Red.1").cell.to_string(), "2xx8");
    assert!(table.events.events().is_empty());

    let game = table.engine.store().find_game(table.game).unwrap().unwrap();
    assert!(!game.is_finished());

    // Nothing to capture any more: the same round now commits.
    table.place("Red.1", "5xx8");
    table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "2xx8").unwrap();
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Red));
}

/// A failing round creation after a move reverts the move.
#[test]
fn test_failed_next_round_reverts_move() {
    let table = Table::with_store(FailingStore::new(None), 2);
    table.place("Blue.1", "0xx8");
    table.place("Red.1", "3xx8");
    let round = table.rolled(Color::Blue, 3);
    table.engine.store().refuse_rounds.store(true, Ordering::SeqCst);

    let result = table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "3xx8");
    assert_eq!(result, offline_fault());

    assert_eq!(table.open_round().map(|r| r.id), Some(round.id));
    assert_eq!(table.pawn("Blue.1").cell.to_string(), "0xx8");
    assert_eq!(table.pawn("Red.1").cell.to_string(), "3xx8");
    assert!(table.events.events().is_empty());

    table.engine.store().refuse_rounds.store(false, Ordering::SeqCst);
    table.commit(Color::Blue, round.id, "Blue.1", "0xx8", "3xx8").unwrap();
    assert_eq!(table.pawn("Red.1").cell.to_string(), "13xx13");
}

/// A failing round creation while skipping a turn leaves the rolled round open.
#[test]
fn test_failed_forfeit_keeps_round_open() {
    let table = Table::with_store(FailingStore::new(None), 2);
    let round = table.rolled(Color::Blue, 2);
    table.engine.store().refuse_rounds.store(true, Ordering::SeqCst);

    let blue = table.player(Color::Blue);
    let result = table.engine.evaluate_options(table.game, blue, round.id);
    assert!(matches!(result, Err(EngineError::Technical(TechnicalFault::Store(_)))));

    let open = table.open_round().unwrap();
    assert_eq!(open.id, round.id);
    assert_eq!(open.status, RoundStatus::AwaitingMove);
    assert!(table.events.events().is_empty());

    table.engine.store().refuse_rounds.store(false, Ordering::SeqCst);
    table.engine.evaluate_options(table.game, blue, round.id).unwrap();
    assert_eq!(table.open_round().unwrap().player_id, table.player(Color::Red));
}

/// A failed start leaves no pawns behind and can be retried.
#[test]
fn test_failed_start_leaves_nothing() {
    let engine = Engine::new(FailingStore::new(None)).with_events(RecordingSink::new());
    let mut game = Game::new("retry");
    game.seat_player(PlayerId::new()).unwrap();
    game.seat_player(PlayerId::new()).unwrap();
    engine.store().create_game(&game).unwrap();
    engine.store().refuse_rounds.store(true, Ordering::SeqCst);

    assert!(engine.start_game(game.id).is_err());
    assert!(engine.pawns(game.id).unwrap().is_empty());
    assert!(!engine.store().find_game(game.id).unwrap().unwrap().is_started());
    assert!(engine.events().events().is_empty());

    engine.store().refuse_rounds.store(false, Ordering::SeqCst);
    engine.start_game(game.id).unwrap();
    assert_eq!(engine.pawns(game.id).unwrap().len(), 8);
}

/// Colour selection follows the seating rules and drives the turn order.
#[test]
fn test_color_selection() {
    let engine = Engine::new(MemoryStorage::new()).with_events(RecordingSink::new());
    let (alice, bob) = (PlayerId::new(), PlayerId::new());
    let mut game = Game::new("colours");
    game.seat_player(alice).unwrap();
    game.seat_player(bob).unwrap();
    engine.store().create_game(&game).unwrap();

    engine.select_color(game.id, alice, Color::Yellow).unwrap();
    assert_eq!(
        engine.select_color(game.id, bob, Color::Yellow),
        Err(EngineError::ColorAlreadyTaken(Color::Yellow))
    );
    let stranger = PlayerId::new();
    assert_eq!(
        engine.select_color(game.id, stranger, Color::Red),
        Err(EngineError::PlayerNotInGame(stranger))
    );
    engine.select_color(game.id, bob, Color::Green).unwrap();

    let first = engine.start_game(game.id).unwrap();
    assert_eq!(first.player_id, alice);
    assert_eq!(
        engine.select_color(game.id, bob, Color::Blue),
        Err(EngineError::GameAlreadyStarted(game.id))
    );

    let yellow = engine
        .store()
        .find_pawn_by_name(game.id, "Yellow.1".parse().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(yellow.player_id, alice);
    assert_eq!(
        engine.events().names(),
        vec!["player-color-selection", "player-color-selection", "game-starts"]
    );
}

/// Seeded engines roll the same dice.
#[test]
fn test_seeded_dice_are_reproducible() {
    let rolls = || {
        let table = Table::new(1);
        let blue = table.player(Color::Blue);
        let mut seen = Vec::new();
        for _ in 0..10 {
            let round = table.open_round().unwrap();
            let rolled = table.engine.roll_dice(table.game, blue, round.id).unwrap();
            seen.push(rolled.dice.unwrap());
            let options = table.engine.evaluate_options(table.game, blue, round.id).unwrap();
            if let Some(choice) = options.movable_pawns.first() {
                table
                    .engine
                    .commit_move(table.game, blue, round.id, choice.name, choice.source, choice.destination)
                    .unwrap();
            }
        }
        seen
    };
    assert_eq!(rolls(), rolls());
}

/// Queries over a running game.
#[test]
fn test_queries() {
    let table = Table::new(2);
    table.place("Red.2", "9xx8");

    let found = table.engine.pawn_on_cell(table.game, "9xx8".parse().unwrap()).unwrap();
    assert_eq!(found.map(|p| p.name.to_string()), Some("Red.2".into()));
    assert!(table.engine.pawn_on_cell(table.game, "10xx8".parse().unwrap()).unwrap().is_none());

    let stats = table.engine.end_stats(table.game).unwrap();
    assert_eq!(stats.round_count, 1);
    assert_eq!(stats.winner, None);
}
