//! Identifiers for persisted records.
//!
//! Games, players, pawns and rounds are identified by random UUIDs so that
//! storage adapters can generate them independently. Each kind of record gets
//! its own newtype so a `RoundId` can never be passed where a `GameId` is
//! expected.
//!
//! ```
//! use ludo_rules::core::{GameId, RoundId};
//!
//! let game = GameId::new();
//! let same: GameId = game.to_string().parse().unwrap();
//! assert_eq!(game, same);
//!
//! // Distinct ids per call
//! assert_ne!(RoundId::new(), RoundId::new());
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

record_id!(
    /// Identifier of a game.
    GameId
);

record_id!(
    /// Identifier of a player. Players exist outside any single game.
    PlayerId
);

record_id!(
    /// Identifier of a pawn record.
    PawnId
);

record_id!(
    /// Identifier of a round (one turn of one player).
    RoundId
);
