//! Core engine types: identifiers, colours, dice RNG, configuration, errors.
//!
//! These are the building blocks shared by every other module. Nothing in
//! here knows about board geometry or turn rules.

pub mod ids;
pub mod color;
pub mod rng;
pub mod config;
pub mod error;

pub use ids::{GameId, PawnId, PlayerId, RoundId};
pub use color::{Color, ColorMap, ParseColorError, COLOR_COUNT};
pub use rng::{DiceRng, DIE_MAX, DIE_MIN};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, StoreError, StoreResult, TechnicalFault};
