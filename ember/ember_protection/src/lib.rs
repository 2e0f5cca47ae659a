//! # Ember Protection
//!
//! This crate implements the Ember plugin commons' protection query protocol:
//! a uniform yes/no permission check over whatever land-protection system a
//! server happens to run. Plugins ask "may this actor perform this action at
//! this location" without knowing which backend answers.
//!
//! ## Core Components
//!
//! - **Action**: The closed set of protectable actions a backend is queried
//!   about
//! - **Module**: The [`ProtectionModule`] trait every backend implements,
//!   and the [`ProtectionManager`] registry that selects the active one
//! - **Claims**: The claim-based reference backend, built on a pluggable
//!   [`ClaimWorld`](claims::ClaimWorld) store
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ember_core::{Actor, ActorId, Location, PluginId, WorldName};
//! use ember_protection::claims::{Claim, ClaimModule, InMemoryClaimWorld};
//! use ember_protection::{ProtectableAction, ProtectionManager};
//!
//! let owner = ActorId::new();
//! let mut world = InMemoryClaimWorld::new();
//! world.add_claim(WorldName::new("overworld"), (0, 0), (15, 15), Claim::new(owner));
//!
//! let mut manager = ProtectionManager::new();
//! manager.register("claims", Box::new(ClaimModule::new(PluginId::new(), Arc::new(world))));
//! manager.activate("claims").unwrap();
//!
//! let spot = Location::new(WorldName::new("overworld"), 4.0, 64.0, 4.0);
//! let stranger = Actor::player(ActorId::new());
//! let allowed = manager
//!     .has_permission(&stranger, &spot, ProtectableAction::BreakBlock)
//!     .unwrap();
//! assert!(allowed);
//! ```

pub mod action;
pub mod claims;
pub mod module;

pub use action::ProtectableAction;
pub use module::{ProtectionManager, ProtectionModule};
