//! Game rules over stored state.
//!
//! - `legality`: pure evaluation of what a rolled round allows
//! - `locks`: per-game serialisation of engine operations
//! - `transaction`: undo log making multi-write operations all-or-nothing
//! - `engine`: the `Engine` running turns against a `Storage`
//!
//! The engine never interprets storage failures; it wraps them as technical
//! faults, reverts the operation and stops.

pub mod legality;
pub mod locks;
mod transaction;
pub mod engine;

pub use legality::{evaluate, MovablePawn, TurnOptions};
pub use locks::GameLocks;
pub use engine::{Engine, EndStats};
