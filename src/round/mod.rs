//! Turn state machine: round records and the hand-off rule.

pub mod model;
pub mod handoff;

pub use model::{MoveDescriptor, Round, RoundStatus};
pub use handoff::{grants_extra_turn, next_actor, NextActor};
