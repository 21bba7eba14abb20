//! Turn hand-off: who plays the round after a closed one.
//!
//! The rule is a table from the closed round's dice value to the next actor,
//! kept apart from the committer so it can be audited on its own:
//!
//! | dice  | next actor   |
//! |-------|--------------|
//! | 1..=5 | next player  |
//! | 6     | same player  |

use serde::{Deserialize, Serialize};

use crate::core::DIE_MAX;

/// Who opens the next round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextActor {
    /// The player who just played goes again.
    SamePlayer,
    /// Turn passes to the next seated player.
    NextPlayer,
}

/// Check if a dice value grants an extra turn.
#[must_use]
pub const fn grants_extra_turn(dice: u8) -> bool {
    dice == DIE_MAX
}

/// Next actor after a round closed with `dice`.
///
/// ```
/// use ludo_rules::round::{next_actor, NextActor};
///
/// assert_eq!(next_actor(6), NextActor::SamePlayer);
/// assert_eq!(next_actor(3), NextActor::NextPlayer);
/// ```
#[must_use]
pub const fn next_actor(dice: u8) -> NextActor {
    if grants_extra_turn(dice) {
        NextActor::SamePlayer
    } else {
        NextActor::NextPlayer
    }
}
