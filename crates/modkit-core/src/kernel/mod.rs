//! # Modkit Core Kernel
//!
//! The `kernel` module owns application start-up. A [`Kernel`] holds the
//! service [`Container`](crate::container::Container), the immutable
//! [`Parameters`] and the ordered list of registered bundles, and walks them
//! through setup, hook, prepare and init exactly once.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Start-up**: [`Kernel::init`] in the `bootstrap` submodule, with the
//!   phases listed by [`KernelPhase`].
//! - **Parameters**: defaults plus overrides, optionally loaded from a file
//!   ([`Parameters::from_path`]).
//! - **Core Constants**: the `constants` submodule.
//! - **Error Handling**: the crate-wide [`Error`] and [`Result`] alias.
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod parameters;
pub mod phase;

pub use bootstrap::{Kernel, WeakKernel};
pub use error::{Error, Result};
pub use parameters::{ExecutionContext, ParameterFormat, Parameters};
pub use phase::KernelPhase;

#[cfg(test)]
mod tests;
