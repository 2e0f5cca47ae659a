//! The protection backend protocol and registry.

use std::collections::BTreeMap;

use ember_core::{Actor, Location, PluginId, ProtectionError};

use crate::action::ProtectableAction;

/// A protection backend.
///
/// A backend answers permission queries against one land-protection
/// system. Implementations bind to their external system in [`load`]
/// (resolving its live data store) and must not be queried before a
/// successful load; querying an unloaded backend is
/// [`ProtectionError::NotLoaded`].
///
/// [`load`]: ProtectionModule::load
pub trait ProtectionModule: Send {
    /// The host plugin context this backend runs under.
    fn plugin(&self) -> PluginId;

    /// Bind to the external protection system.
    ///
    /// Called once by the registry when the backend is activated. A
    /// failed load leaves the backend unloaded.
    fn load(&mut self) -> Result<(), ProtectionError>;

    /// Whether `actor` may perform `action` at `location`.
    fn has_permission(
        &self,
        actor: &Actor,
        location: &Location,
        action: ProtectableAction,
    ) -> Result<bool, ProtectionError>;
}

/// Registry of protection backends, at most one active.
///
/// Servers typically run a single protection system; the manager holds
/// every registered backend and routes queries to the one that was
/// activated. With no active backend there is nothing to consult and
/// every query permits.
#[derive(Default)]
pub struct ProtectionManager {
    backends: BTreeMap<String, Box<dyn ProtectionModule>>,
    active: Option<String>,
}

impl ProtectionManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under `id`, replacing any previous backend with
    /// the same id.
    pub fn register(&mut self, id: impl Into<String>, backend: Box<dyn ProtectionModule>) {
        let id = id.into();
        if self.backends.insert(id.clone(), backend).is_some() {
            log::warn!("replacing protection backend {}", id);
        }
    }

    /// Registered backend ids, in registration-name order.
    pub fn backends(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }

    /// The id of the active backend, if one was activated.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Load and select the backend registered under `id`.
    ///
    /// Only a successful load selects the backend; on failure the
    /// previously active backend, if any, stays active.
    pub fn activate(&mut self, id: &str) -> Result<(), ProtectionError> {
        let backend = self
            .backends
            .get_mut(id)
            .ok_or_else(|| ProtectionError::BackendNotFound(id.to_string()))?;
        backend.load()?;
        log::info!("protection backend {} active", id);
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Query the active backend.
    ///
    /// Permits when no backend is active: a server without a protection
    /// system has no restrictions to enforce.
    pub fn has_permission(
        &self,
        actor: &Actor,
        location: &Location,
        action: ProtectableAction,
    ) -> Result<bool, ProtectionError> {
        match self.active.as_ref().and_then(|id| self.backends.get(id)) {
            Some(backend) => backend.has_permission(actor, location, action),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{ActorId, WorldName};

    struct StubBackend {
        plugin: PluginId,
        loaded: bool,
        fail_load: bool,
        answer: bool,
    }

    impl StubBackend {
        fn answering(answer: bool) -> Self {
            Self {
                plugin: PluginId::new(),
                loaded: false,
                fail_load: false,
                answer,
            }
        }

        fn failing() -> Self {
            Self {
                fail_load: true,
                ..Self::answering(true)
            }
        }
    }

    impl ProtectionModule for StubBackend {
        fn plugin(&self) -> PluginId {
            self.plugin
        }

        fn load(&mut self) -> Result<(), ProtectionError> {
            if self.fail_load {
                return Err(ProtectionError::LoadFailed("stub".to_string()));
            }
            self.loaded = true;
            Ok(())
        }

        fn has_permission(
            &self,
            _actor: &Actor,
            _location: &Location,
            _action: ProtectableAction,
        ) -> Result<bool, ProtectionError> {
            if !self.loaded {
                return Err(ProtectionError::NotLoaded(self.plugin));
            }
            Ok(self.answer)
        }
    }

    fn somewhere() -> Location {
        Location::new(WorldName::new("w"), 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_no_active_backend_permits() {
        let manager = ProtectionManager::new();
        let actor = Actor::player(ActorId::new());
        assert!(manager
            .has_permission(&actor, &somewhere(), ProtectableAction::BreakBlock)
            .unwrap());
    }

    #[test]
    fn test_activate_unknown_backend() {
        let mut manager = ProtectionManager::new();
        assert!(matches!(
            manager.activate("ghost"),
            Err(ProtectionError::BackendNotFound(_))
        ));
    }

    #[test]
    fn test_activated_backend_answers_queries() {
        let mut manager = ProtectionManager::new();
        manager.register("deny-all", Box::new(StubBackend::answering(false)));
        manager.activate("deny-all").unwrap();

        let actor = Actor::player(ActorId::new());
        assert!(!manager
            .has_permission(&actor, &somewhere(), ProtectableAction::PlaceBlock)
            .unwrap());
        assert_eq!(manager.active(), Some("deny-all"));
    }

    #[test]
    fn test_failed_load_does_not_activate() {
        let mut manager = ProtectionManager::new();
        manager.register("good", Box::new(StubBackend::answering(false)));
        manager.register("bad", Box::new(StubBackend::failing()));

        manager.activate("good").unwrap();
        assert!(matches!(
            manager.activate("bad"),
            Err(ProtectionError::LoadFailed(_))
        ));
        // The previous backend is still the one answering
        assert_eq!(manager.active(), Some("good"));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut manager = ProtectionManager::new();
        manager.register("claims", Box::new(StubBackend::answering(true)));
        manager.register("claims", Box::new(StubBackend::answering(false)));
        manager.activate("claims").unwrap();

        let actor = Actor::player(ActorId::new());
        assert!(!manager
            .has_permission(&actor, &somewhere(), ProtectableAction::InteractBlock)
            .unwrap());
    }
}
