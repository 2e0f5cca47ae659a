//! Spatial value types: regions, positions, and tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The name of a world (region), used as a stable reference.
///
/// The world object itself lives in the host runtime; the document layer
/// only ever stores and reconstructs the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldName(String);

impl WorldName {
    /// Create a world name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorldName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A block material tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(String);

impl MaterialId {
    /// Create a material tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named sound effect tag.
///
/// Behaves like an enum name on the host side; stored as its name string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundTag(String);

impl SoundTag {
    /// Create a sound tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The tag name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in a world with orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Owning world, by name.
    pub world: WorldName,

    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Vertical view angle in degrees.
    pub pitch: f32,

    /// Horizontal view angle in degrees.
    pub yaw: f32,
}

impl Location {
    /// Create a location with no orientation.
    pub fn new(world: WorldName, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Create a location with orientation.
    pub fn with_orientation(
        world: WorldName,
        x: f64,
        y: f64,
        z: f64,
        pitch: f32,
        yaw: f32,
    ) -> Self {
        Self {
            world,
            x,
            y,
            z,
            pitch,
            yaw,
        }
    }
}

/// A grid cell together with its owning world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    /// Owning world, by name.
    pub world: WorldName,
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Create a chunk reference.
    pub fn new(world: WorldName, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_name_tags_order_lexically() {
        assert!(WorldName::new("hub") < WorldName::new("nether"));
        assert!(MaterialId::new("beacon") < MaterialId::new("chest"));

        // Both serve as ordered-collection keys
        let mut worlds = BTreeSet::new();
        worlds.insert(WorldName::new("nether"));
        worlds.insert(WorldName::new("hub"));
        assert_eq!(worlds.iter().next().map(WorldName::as_str), Some("hub"));

        let mut materials = BTreeSet::new();
        materials.insert(MaterialId::new("chest"));
        materials.insert(MaterialId::new("chest"));
        assert_eq!(materials.len(), 1);
    }
}
