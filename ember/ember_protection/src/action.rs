//! The closed set of actions a protection backend can be queried about.

use serde::{Deserialize, Serialize};

/// An action an actor may attempt at a protected location.
///
/// Backends dispatch on this to pick the matching trust level; actions
/// without a dedicated rule fall back to the backend's general-access
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectableAction {
    /// Using a block: opening a container, pressing a button.
    InteractBlock,

    /// Using a non-hostile entity: trading, leashing.
    InteractEntity,

    /// Damaging another player.
    AttackPlayer,

    /// Damaging a non-player entity.
    AttackEntity,

    /// Destroying a block.
    BreakBlock,

    /// Placing a block.
    PlaceBlock,
}

impl ProtectableAction {
    /// Whether this action targets a block rather than an entity.
    pub fn targets_block(self) -> bool {
        matches!(
            self,
            Self::InteractBlock | Self::BreakBlock | Self::PlaceBlock
        )
    }
}
