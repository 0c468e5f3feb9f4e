//! # Modkit Core Container Errors
//!
//! Defines [`ContainerError`], returned when a service lookup cannot be
//! satisfied by the [`Container`](crate::container::Container).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No service bound for '{service}'")]
    ServiceNotFound { service: String },

    #[error("Service '{service}' is bound, but not as a '{expected}'")]
    TypeMismatch {
        service: String,
        expected: &'static str,
    },
}
