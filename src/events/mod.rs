//! Engine events.
//!
//! Every state change the engine commits is announced as an [`EngineEvent`]
//! to the engine's [`EventSink`]. The engine only cares that events are
//! emitted with stable names; delivering them (SSE, a message bus, a log)
//! is the sink's business.
//!
//! ## Event names
//!
//! | Variant               | Name                     |
//! |-----------------------|--------------------------|
//! | `DiceLaunched`        | `dice-launched`          |
//! | `RoundCreated`        | `round-created`          |
//! | `PawnMoved`           | `pawn-moved`             |
//! | `PawnCaptured`        | `traycase-updated`       |
//! | `GameStarted`         | `game-starts`            |
//! | `GameFinished`        | `game-finished`          |
//! | `PlayerColorSelected` | `player-color-selection` |
//!
//! Publishing is infallible: a sink that cannot deliver must not undo a
//! committed move.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::core::{Color, GameId, PlayerId, RoundId};
use crate::pawn::PawnName;

/// A state change committed by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    #[serde(rename = "dice-launched")]
    DiceLaunched {
        game_id: GameId,
        round_id: RoundId,
        player_id: PlayerId,
        dice: u8,
    },

    #[serde(rename = "round-created")]
    RoundCreated {
        game_id: GameId,
        round_id: RoundId,
        player_id: PlayerId,
    },

    #[serde(rename = "pawn-moved")]
    PawnMoved {
        game_id: GameId,
        round_id: RoundId,
        pawn: PawnName,
        from: Cell,
        to: Cell,
    },

    /// A pawn was captured and sent back to `cell`, its pen slot.
    #[serde(rename = "traycase-updated")]
    PawnCaptured {
        game_id: GameId,
        pawn: PawnName,
        captured_on: Cell,
        cell: Cell,
    },

    #[serde(rename = "game-starts")]
    GameStarted {
        game_id: GameId,
        round_id: RoundId,
        first_player: PlayerId,
    },

    #[serde(rename = "game-finished")]
    GameFinished { game_id: GameId, winner: PlayerId },

    #[serde(rename = "player-color-selection")]
    PlayerColorSelected {
        game_id: GameId,
        player_id: PlayerId,
        color: Color,
    },
}

impl EngineEvent {
    /// Stable wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            EngineEvent::DiceLaunched { .. } => "dice-launched",
            EngineEvent::RoundCreated { .. } => "round-created",
            EngineEvent::PawnMoved { .. } => "pawn-moved",
            EngineEvent::PawnCaptured { .. } => "traycase-updated",
            EngineEvent::GameStarted { .. } => "game-starts",
            EngineEvent::GameFinished { .. } => "game-finished",
            EngineEvent::PlayerColorSelected { .. } => "player-color-selection",
        }
    }

    /// Game the event belongs to.
    #[must_use]
    pub fn game_id(&self) -> GameId {
        match self {
            EngineEvent::DiceLaunched { game_id, .. }
            | EngineEvent::RoundCreated { game_id, .. }
            | EngineEvent::PawnMoved { game_id, .. }
            | EngineEvent::PawnCaptured { game_id, .. }
            | EngineEvent::GameStarted { game_id, .. }
            | EngineEvent::GameFinished { game_id, .. }
            | EngineEvent::PlayerColorSelected { game_id, .. } => *game_id,
        }
    }
}

/// Receiver of engine events.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn publish(&self, event: EngineEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: EngineEvent) {
        (**self).publish(event);
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: EngineEvent) {}
}

/// Sink that keeps every event in memory, in publication order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Names of the recorded events.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(EngineEvent::name)
            .collect()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: EngineEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

/// Sink that logs every event through `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: EngineEvent) {
        tracing::info!(event = event.name(), game = %event.game_id(), details = ?event, "engine event");
    }
}
