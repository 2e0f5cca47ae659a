//! # Ember Config
//!
//! This crate implements the typed configuration store of the Ember plugin
//! commons: a layered abstraction over the hierarchical document in
//! `ember_core` that adds typed accessors with defaulting and a polymorphic
//! value-marshalling protocol for domain objects too rich for the native
//! document model.
//!
//! Writes are polymorphic: `Config::set_value` accepts anything convertible
//! to [`RichValue`] and dispatches over a fixed-priority codec table that
//! flattens composite values into primitive document paths. Reads are
//! nominally typed by call site: each codec kind has a dedicated getter
//! (`get_uuid`, `get_location`, `get_inventory`, ...) and no type tag is
//! stored, so callers must know which getter matches what was written.
//!
//! ## Usage Example
//!
//! ```
//! use ember_config::Config;
//! use ember_core::{Location, WorldName};
//!
//! let mut config = Config::open("plugins/demo/config.yml");
//!
//! // Defaults only apply where nothing is stored yet
//! config.set_default("teleport.delay", 3);
//! let delay = config.get_int("teleport.delay").unwrap();
//! assert_eq!(delay, 3);
//!
//! // Composite values expand into sub-keys and read back typed
//! let spawn = Location::new(WorldName::new("hub"), 0.5, 64.0, 0.5);
//! config.set_value("teleport.spawn", spawn.clone());
//! assert_eq!(config.get_location("teleport.spawn").unwrap(), spawn);
//! ```

mod codec;
mod store;

pub use codec::RichValue;
pub use store::Config;
