//! Error types for the Ember commons library.
//!
//! This module defines the error hierarchy used throughout the workspace.
//! Errors are organized by subsystem, with each subsystem having its own
//! error type. The root `Error` type can wrap any of the subsystem-specific
//! errors, allowing for uniform error handling at the top level.

use crate::id::PluginId;
use thiserror::Error;

/// Root error type for the Ember system.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration store errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Protection backend errors
    #[error("Protection error: {0}")]
    Protection(#[from] ProtectionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors related to the typed configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A stored value could not be coerced to the requested numeric type.
    ///
    /// Raised by the text-round-trip getters (`get_float`, `get_long`) when
    /// the path is absent or its display form is not numeric text.
    #[error("Cannot coerce value at '{path}': found {found}")]
    Coercion {
        /// Path of the offending value
        path: String,

        /// Display form of what was actually stored ("nothing" when absent)
        found: String,
    },

    /// A key required by a composite decoder was not present
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// A location-based value referenced a region that is not stored
    #[error("Dangling region reference at '{0}'")]
    DanglingReference(String),
}

/// Errors related to protection backends.
#[derive(Debug, Error)]
pub enum ProtectionError {
    /// The backend was queried before `load()` bound it to its external system
    #[error("Protection backend for plugin {0} queried before load()")]
    NotLoaded(PluginId),

    /// No backend is registered under the given identifier
    #[error("Protection backend not found: {0}")]
    BackendNotFound(String),

    /// The backend failed to bind to its external authorization system
    #[error("Protection backend failed to load: {0}")]
    LoadFailed(String),
}

/// Result type used throughout the Ember system.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let cfg_err = ConfigError::MissingKey("menu.size".into());
        let error: Error = cfg_err.into();
        assert!(matches!(error, Error::Config(_)));

        let prot_err = ProtectionError::BackendNotFound("claims".into());
        let error: Error = prot_err.into();
        assert!(matches!(error, Error::Protection(_)));
    }

    #[test]
    fn test_error_display() {
        let plugin_id = PluginId::new();
        let error: Error = ProtectionError::NotLoaded(plugin_id).into();
        let display = format!("{}", error);
        assert!(display.contains(&plugin_id.to_string()));
        assert!(display.contains("before load()"));
    }

    #[test]
    fn test_coercion_display_names_path() {
        let error = ConfigError::Coercion {
            path: "spawn.delay".into(),
            found: "nothing".into(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot coerce value at 'spawn.delay': found nothing"
        );
    }
}
