//! # Modkit Core Bundle System Errors
//!
//! Defines [`BundleSystemError`], covering configuration resolution,
//! dependency checks and the per-bundle phase latch.
use thiserror::Error;

use crate::bundle::phase::BundlePhase;

#[derive(Debug, Error)]
pub enum BundleSystemError {
    /// Raised by `Bundle::validate` implementations.
    #[error("Invalid configuration for bundle '{bundle}': {message}")]
    InvalidConfig { bundle: String, message: String },

    #[error("Configuration for bundle '{bundle}' does not match its schema: {source}")]
    ConfigDeserialization {
        bundle: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration for bundle '{bundle}' could not be serialized: {source}")]
    ConfigSerialization {
        bundle: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bundle '{bundle}' has no configuration yet (setup has not run)")]
    ConfigUnavailable { bundle: String },

    #[error("Configuration for bundle '{bundle}' is locked in phase {phase}")]
    ConfigLocked { bundle: String, phase: BundlePhase },

    #[error("Bundle '{bundle}' depends on '{dependency}', which is not registered")]
    DependencyMissing { bundle: String, dependency: String },

    #[error("Bundle '{bundle}' is already registered")]
    DuplicateBundle { bundle: String },

    #[error("Bundle '{bundle}' is frozen, cannot move to phase {attempted}")]
    FrozenBundle { bundle: String, attempted: BundlePhase },

    #[error("Bundle '{bundle}' is not attached to a live kernel")]
    KernelUnavailable { bundle: String },
}

impl BundleSystemError {
    pub fn invalid_config(bundle: impl Into<String>, message: impl Into<String>) -> Self {
        BundleSystemError::InvalidConfig {
            bundle: bundle.into(),
            message: message.into(),
        }
    }
}
