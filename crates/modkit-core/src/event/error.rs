//! # Modkit Core Event System Errors
//!
//! Defines [`EventSystemError`], raised by event validation. Errors returned
//! by listeners are propagated to the emitter unchanged and are not wrapped
//! here.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Invalid event data for event '{event_name}': {details}")]
    InvalidEvent {
        event_name: String,
        details: String,
    },
}

impl EventSystemError {
    pub fn invalid_event(event_name: impl Into<String>, details: impl Into<String>) -> Self {
        EventSystemError::InvalidEvent {
            event_name: event_name.into(),
            details: details.into(),
        }
    }
}
