//! Actor identity.

use serde::{Deserialize, Serialize};

use crate::id::ActorId;

/// An actor attempting an action: a player or a non-player entity.
///
/// `interactive` distinguishes a live, interactive player from offline
/// identities and non-player entities; protection backends treat
/// non-interactive actors conservatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub interactive: bool,
}

impl Actor {
    /// An interactive player.
    pub fn player(id: ActorId) -> Self {
        Self {
            id,
            interactive: true,
        }
    }

    /// A non-player (or offline) actor.
    pub fn non_player(id: ActorId) -> Self {
        Self {
            id,
            interactive: false,
        }
    }
}
