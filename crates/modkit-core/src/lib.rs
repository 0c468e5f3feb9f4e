//! # Modkit Core
//!
//! Compose an application from bundles: register them on a [`Kernel`], call
//! [`Kernel::init`], and let each bundle hook into its siblings' start-up
//! through the [`EventManager`].
pub mod bundle;
pub mod container;
pub mod event;
pub mod kernel;
pub mod utils;

pub use bundle::{
    Bundle, BundleContext, BundleHost, BundleId, BundlePhase, BundleRef, Initializable,
    WarmupTarget,
};
pub use container::{Container, Injectable, Key};
pub use event::{Event, EventManager, GlobalHandler, Handler, Listener, ListenerOptions};
pub use kernel::error::{Error, Result};
pub use kernel::{ExecutionContext, Kernel, KernelPhase, Parameters};

#[cfg(test)]
mod tests;
