//! The claim-based reference backend.
//!
//! A claim is a region of a world owned by one actor, with per-actor trust
//! lists at three levels (access, containers, building) and an optional
//! active siege. The backend answers permission queries by locating the
//! claim covering the queried position and consulting its trust lists.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ember_core::{
    Actor, ActorId, ClaimId, Location, MaterialId, PluginId, ProtectionError, WorldName,
};

use crate::action::ProtectableAction;
use crate::module::ProtectionModule;

/// An active siege on a claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Siege {
    /// The besieging actor, once combat has started.
    pub attacker: Option<ActorId>,
}

/// A protected region owned by one actor.
///
/// Trust is layered: building trust implies container trust, container
/// trust implies access trust. Breaking is only restricted for materials
/// the claim explicitly protects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub id: ClaimId,
    pub owner: ActorId,
    siege: Option<Siege>,
    builders: BTreeSet<ActorId>,
    containers: BTreeSet<ActorId>,
    accessors: BTreeSet<ActorId>,
    protected_materials: BTreeSet<MaterialId>,
}

impl Claim {
    /// Create a claim owned by `owner` with empty trust lists.
    pub fn new(owner: ActorId) -> Self {
        Self {
            id: ClaimId::new(),
            owner,
            siege: None,
            builders: BTreeSet::new(),
            containers: BTreeSet::new(),
            accessors: BTreeSet::new(),
            protected_materials: BTreeSet::new(),
        }
    }

    /// Grant building trust (implies container and access trust).
    pub fn with_builder(mut self, actor: ActorId) -> Self {
        self.builders.insert(actor);
        self
    }

    /// Grant container trust (implies access trust).
    pub fn with_container(mut self, actor: ActorId) -> Self {
        self.containers.insert(actor);
        self
    }

    /// Grant access trust.
    pub fn with_accessor(mut self, actor: ActorId) -> Self {
        self.accessors.insert(actor);
        self
    }

    /// Restrict breaking of `material` to actors with building trust.
    pub fn with_protected_material(mut self, material: MaterialId) -> Self {
        self.protected_materials.insert(material);
        self
    }

    /// Put the claim under siege.
    pub fn with_siege(mut self, siege: Siege) -> Self {
        self.siege = Some(siege);
        self
    }

    /// The active siege, if any.
    pub fn siege(&self) -> Option<&Siege> {
        self.siege.as_ref()
    }

    /// Why `actor` may not enter or use the claim, or `None` when allowed.
    pub fn deny_access(&self, actor: &ActorId) -> Option<String> {
        if self.accessors.contains(actor)
            || self.containers.contains(actor)
            || self.builders.contains(actor)
        {
            None
        } else {
            Some(format!("{} has no access trust here", actor))
        }
    }

    /// Why `actor` may not use containers here, or `None` when allowed.
    pub fn deny_container(&self, actor: &ActorId) -> Option<String> {
        if self.containers.contains(actor) || self.builders.contains(actor) {
            None
        } else {
            Some(format!("{} has no container trust here", actor))
        }
    }

    /// Why `actor` may not build here, or `None` when allowed.
    pub fn deny_build(&self, actor: &ActorId) -> Option<String> {
        if self.builders.contains(actor) {
            None
        } else {
            Some(format!("{} has no building trust here", actor))
        }
    }

    /// Why `actor` may not break a block of `material` here, or `None`
    /// when allowed. Materials the claim does not protect are free to
    /// break.
    pub fn deny_break(&self, actor: &ActorId, material: &MaterialId) -> Option<String> {
        if self.protected_materials.contains(material) {
            self.deny_build(actor)
        } else {
            None
        }
    }
}

/// The live store of an external claim system.
///
/// The reference backend is generic over this seam: production binds the
/// real protection plugin's store, tests bind [`InMemoryClaimWorld`].
pub trait ClaimWorld: Send + Sync {
    /// The claim covering `location`, if any.
    ///
    /// With `include_subareas` set, a subarea covering the position takes
    /// priority over its parent claim; otherwise subareas are invisible.
    fn claim_at(&self, location: &Location, include_subareas: bool) -> Option<&Claim>;

    /// The block material at `location`.
    fn material_at(&self, location: &Location) -> MaterialId;
}

/// The claim-based protection backend.
///
/// Holds its claim store unbound until [`load`](ProtectionModule::load);
/// queries against an unloaded backend fail with
/// [`ProtectionError::NotLoaded`].
pub struct ClaimModule {
    plugin: PluginId,
    source: Arc<dyn ClaimWorld>,
    store: Option<Arc<dyn ClaimWorld>>,
}

impl ClaimModule {
    /// Create an unloaded backend over `source`.
    pub fn new(plugin: PluginId, source: Arc<dyn ClaimWorld>) -> Self {
        Self {
            plugin,
            source,
            store: None,
        }
    }
}

impl ProtectionModule for ClaimModule {
    fn plugin(&self) -> PluginId {
        self.plugin
    }

    fn load(&mut self) -> Result<(), ProtectionError> {
        self.store = Some(Arc::clone(&self.source));
        Ok(())
    }

    fn has_permission(
        &self,
        actor: &Actor,
        location: &Location,
        action: ProtectableAction,
    ) -> Result<bool, ProtectionError> {
        let store = self
            .store
            .as_ref()
            .ok_or(ProtectionError::NotLoaded(self.plugin))?;

        let claim = match store.claim_at(location, true) {
            Some(claim) => claim,
            None => return Ok(true),
        };

        if claim.owner == actor.id {
            return Ok(true);
        }
        if !actor.interactive {
            // Offline identities and non-player entities get no trust
            // lookup inside a foreign claim
            return Ok(false);
        }

        let permitted = match action {
            ProtectableAction::InteractBlock => claim.deny_container(&actor.id).is_none(),
            ProtectableAction::AttackPlayer => {
                claim.siege().map_or(true, |siege| siege.attacker.is_none())
            }
            ProtectableAction::BreakBlock => claim
                .deny_break(&actor.id, &store.material_at(location))
                .is_none(),
            ProtectableAction::PlaceBlock => claim.deny_build(&actor.id).is_none(),
            _ => claim.deny_access(&actor.id).is_none(),
        };
        Ok(permitted)
    }
}

type BlockKey = (WorldName, i64, i64, i64);

struct Region {
    world: WorldName,
    min: (i32, i32),
    max: (i32, i32),
    subarea: bool,
    claim: Claim,
}

impl Region {
    fn covers(&self, location: &Location) -> bool {
        if self.world != location.world {
            return false;
        }
        let x = location.x.floor() as i32;
        let z = location.z.floor() as i32;
        x >= self.min.0 && x <= self.max.0 && z >= self.min.1 && z <= self.max.1
    }
}

/// In-memory [`ClaimWorld`]: rectangular x/z regions plus a block
/// material map. Height is ignored, as claims span their full column.
#[derive(Default)]
pub struct InMemoryClaimWorld {
    regions: Vec<Region>,
    materials: BTreeMap<BlockKey, MaterialId>,
}

impl InMemoryClaimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level claim covering the rectangle from `min` to `max`
    /// (inclusive x/z block coordinates).
    pub fn add_claim(&mut self, world: WorldName, min: (i32, i32), max: (i32, i32), claim: Claim) {
        self.add_region(world, min, max, false, claim);
    }

    /// Add a subarea claim.
    pub fn add_subarea(&mut self, world: WorldName, min: (i32, i32), max: (i32, i32), claim: Claim) {
        self.add_region(world, min, max, true, claim);
    }

    fn add_region(
        &mut self,
        world: WorldName,
        min: (i32, i32),
        max: (i32, i32),
        subarea: bool,
        claim: Claim,
    ) {
        self.regions.push(Region {
            world,
            min: (min.0.min(max.0), min.1.min(max.1)),
            max: (min.0.max(max.0), min.1.max(max.1)),
            subarea,
            claim,
        });
    }

    /// Record the block material at a position.
    pub fn set_material(&mut self, location: &Location, material: MaterialId) {
        self.materials.insert(block_key(location), material);
    }
}

fn block_key(location: &Location) -> BlockKey {
    (
        location.world.clone(),
        location.x.floor() as i64,
        location.y.floor() as i64,
        location.z.floor() as i64,
    )
}

impl ClaimWorld for InMemoryClaimWorld {
    fn claim_at(&self, location: &Location, include_subareas: bool) -> Option<&Claim> {
        if include_subareas {
            if let Some(region) = self
                .regions
                .iter()
                .find(|r| r.subarea && r.covers(location))
            {
                return Some(&region.claim);
            }
        }
        self.regions
            .iter()
            .find(|r| !r.subarea && r.covers(location))
            .map(|r| &r.claim)
    }

    fn material_at(&self, location: &Location) -> MaterialId {
        self.materials
            .get(&block_key(location))
            .cloned()
            .unwrap_or_else(|| MaterialId::new("air"))
    }
}
