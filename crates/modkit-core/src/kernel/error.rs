//! # Modkit Core Kernel Errors
//!
//! Defines [`Error`], the crate-wide error type, and the [`Result`] alias
//! used by every hook, handler and factory.
//!
//! Subsystem errors ([`EventSystemError`], [`BundleSystemError`],
//! [`ContainerError`]) convert into [`Error`] with `?`. Errors raised by user
//! code travel through the kernel unchanged, so a caller of
//! [`Kernel::init`](crate::kernel::Kernel::init) can match the exact value a
//! hook returned.
use std::error::Error as StdError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::bundle::error::BundleSystemError;
use crate::container::error::ContainerError;
use crate::event::error::EventSystemError;
use crate::kernel::phase::KernelPhase;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    #[error("Bundle system error: {0}")]
    BundleSystem(#[from] BundleSystemError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// The kernel finished `init`; no more bundles are accepted.
    #[error("Kernel is frozen, cannot add bundle '{bundle}'")]
    KernelFrozen { bundle: String },

    /// An operation was attempted in a kernel phase that does not allow it.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelPhase,
        bundle: Option<String>,
        message: String,
    },

    #[error("Failed to load parameters from '{}': {message}", path.display())]
    ParameterLoad {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    pub fn lifecycle(phase: KernelPhase, message: impl Into<String>) -> Self {
        Error::KernelLifecycleError {
            phase,
            bundle: None,
            message: message.into(),
        }
    }

    pub fn parameter_load(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Error::ParameterLoad {
            path: path.into(),
            message: message.into(),
            source,
        }
    }
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
