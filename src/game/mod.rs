//! Game records and seating.

pub mod model;

pub use model::Game;
