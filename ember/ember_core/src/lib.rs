//! # Ember Core
//!
//! `ember_core` provides the fundamental building blocks for the Ember plugin
//! commons library. This includes error types, ID definitions, the
//! hierarchical document model backing configuration files, and the
//! world-model value types shared by the higher-level crates.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all Ember components
//! - **id**: Strongly-typed identifier types
//! - **document**: The hierarchical key/value document and its value model
//! - **types**: World-model data structures consumed by the codec layer

pub mod document;
pub mod error;
pub mod id;
pub mod types;

// Re-export key types for convenience
pub use document::{Document, DocumentValue, FromDocumentValue};
pub use error::{ConfigError, Error, ProtectionError, Result};
pub use id::{ActorId, ClaimId, PluginId};
pub use types::{
    Actor, ChunkPos, Inventory, ItemStack, Location, MaterialId, SoundTag, Timestamp, WorldName,
};
