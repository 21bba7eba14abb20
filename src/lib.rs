//! # ludo-rules
//!
//! Rules engine for a four-player cross-shaped race board game, a
//! Ludo/Parcheesi variant.
//!
//! ## Design Principles
//!
//! 1. **One geometry rule**: the board is a 56-cell ring of four colour
//!    quarters, plus a private lane and pen per colour. Movement is one
//!    modular rule for every colour, with lane entry and centre entry as
//!    named special cases.
//!
//! 2. **Pure decisions, thin orchestration**: what a roll allows is a pure
//!    function of the round and a pawn snapshot. The engine only loads,
//!    decides, writes and announces.
//!
//! 3. **Storage is a seam**: the engine works against small store traits;
//!    an in-memory implementation ships for tests and simulations.
//!
//! ## Modules
//!
//! - `core`: ids, colours, dice RNG, configuration, errors
//! - `board`: cells, coordinates and static topology
//! - `pawn`: pawn records and the movement resolver
//! - `round`: the per-turn state machine and the hand-off table
//! - `game`: game records and seating
//! - `rules`: legality evaluation and the `Engine`
//! - `events`: named engine events and sinks
//! - `store`: storage traits and `MemoryStorage`
//! - `logging`: tracing subscriber setup for binaries

pub mod core;
pub mod board;
pub mod pawn;
pub mod round;
pub mod game;
pub mod rules;
pub mod events;
pub mod store;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{
    Color, ColorMap,
    GameId, PawnId, PlayerId, RoundId,
    DiceRng,
    EngineConfig,
    EngineError, EngineResult, StoreError, StoreResult, TechnicalFault,
};

pub use crate::board::{Cell, Coord, ParseCellError};

pub use crate::pawn::{Pawn, PawnName};

pub use crate::round::{MoveDescriptor, NextActor, Round, RoundStatus};

pub use crate::game::Game;

pub use crate::rules::{Engine, EndStats, MovablePawn, TurnOptions};

pub use crate::events::{EngineEvent, EventSink, NullSink, RecordingSink, TracingSink};

pub use crate::store::{GameStore, MemoryStorage, PawnStore, RoundStore, Storage};
