//! Strongly-typed identifiers for the Ember commons library.
//!
//! This module provides a set of identifier types used throughout the
//! system, ensuring type safety and clear semantics. Each identifier type
//! is a thin wrapper around a UUID with a phantom type parameter so that
//! identifiers for different entity kinds cannot be mixed up.
//!
//! # Examples
//!
//! ```
//! use ember_core::id::{ActorId, PluginId};
//! use std::str::FromStr;
//!
//! // Create new random IDs
//! let plugin_id = PluginId::new();
//! let actor_id = ActorId::new();
//!
//! // Create from string
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let actor_id = ActorId::from_str(id_str).unwrap();
//! assert_eq!(actor_id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
///
/// This is a generic identifier type that is specialized for different
/// entity types using the phantom type parameter `T`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: std::marker::PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an identifier from a specific UUID.
    ///
    /// This is useful when the UUID is already known, such as when
    /// reconstructing an identifier from a stored document.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Create a nil (all zeros) identifier.
    ///
    /// This can be useful as a sentinel or default value.
    pub fn nil() -> Self {
        Self {
            uuid: Uuid::nil(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Check if this is a nil identifier.
    pub fn is_nil(&self) -> bool {
        self.uuid == Uuid::nil()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            uuid: Uuid::parse_str(s)?,
            _marker: std::marker::PhantomData,
        })
    }
}

/// Marker type for host plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginMarker;
/// Identifier for a host plugin context.
pub type PluginId = Id<PluginMarker>;

/// Marker type for actors (players and non-player entities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorMarker;
/// Identifier for an actor.
pub type ActorId = Id<ActorMarker>;

/// Marker type for claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimMarker;
/// Identifier for a protected claim.
pub type ClaimId = Id<ClaimMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_new() {
        let id1 = ActorId::new();
        let id2 = ActorId::new();
        assert_ne!(id1, id2, "Generated IDs should be unique");
    }

    #[test]
    fn test_id_display() {
        let id = PluginId::new();
        let display = id.to_string();
        assert_eq!(display.len(), 36, "UUID string should be 36 characters");
    }

    #[test]
    fn test_id_from_str() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = ActorId::from_str(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn test_id_nil() {
        let nil_id = ClaimId::nil();
        assert_eq!(nil_id.to_string(), "00000000-0000-0000-0000-000000000000");
        assert!(nil_id.is_nil());
    }

    #[test]
    fn test_id_orders_like_its_uuid() {
        use std::collections::BTreeSet;

        let low = ActorId::from_uuid(Uuid::from_u128(1));
        let high = ActorId::from_uuid(Uuid::from_u128(2));
        assert!(low < high);

        // Ids work as ordered-collection keys
        let mut set = BTreeSet::new();
        set.insert(high);
        set.insert(low);
        set.insert(low);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next(), Some(&low));
    }

    #[test]
    fn test_type_safety() {
        // Different ID types are different types, even with the same UUID
        let same_uuid = Uuid::new_v4();
        let plugin_id = PluginId::from_uuid(same_uuid);
        let actor_id = ActorId::from_uuid(same_uuid);

        assert_eq!(plugin_id.uuid(), actor_id.uuid());
        // This would not compile:
        // assert_eq!(plugin_id, actor_id);
    }
}
