//! World-model data structures.
//!
//! These are the opaque stand-ins for host runtime objects that the codec
//! layer knows how to flatten into document paths: spatial values, item
//! containers, tags, and actors.

mod actor;
mod item;
mod time;
mod world;

pub use actor::Actor;
pub use item::{Inventory, ItemStack};
pub use time::Timestamp;
pub use world::{ChunkPos, Location, MaterialId, SoundTag, WorldName};
