//! # Modkit Core Bundle System
//!
//! Bundles are the units an application is composed from. Each one carries
//! a typed configuration, may declare other bundles it depends on, and takes
//! part in the kernel's phased start-up through the [`Bundle`] hooks.
//!
//! ## Key Components
//!
//! - **[`Bundle`]**: the trait implemented by application code.
//! - **[`BundleHost`]**: a registered bundle plus its phase, resolved
//!   configuration and kernel back-reference.
//! - **[`BundleRef`]**: a cloneable, type-erased handle to a host, carried by
//!   lifecycle events.
//! - **[`BundleContext`]**: passed to every hook.
//! - **[`WarmupTarget`]** / **[`Initializable`]**: eager service start-up.
//! - **[`BundlePhase`]**: the per-bundle phase latch.
pub mod context;
pub mod error;
pub mod host;
pub mod phase;
pub mod traits;
pub mod warmup;

pub use context::BundleContext;
pub use error::BundleSystemError;
pub use host::{BundleHost, BundleRef};
pub use phase::BundlePhase;
pub use traits::{Bundle, BundleId};
pub use warmup::{Initializable, WarmupTarget};

#[cfg(test)]
mod tests;
