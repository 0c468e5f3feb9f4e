//! Kernel lifecycle events.
//!
//! Emitted through the kernel's [`EventManager`](crate::event::EventManager)
//! like any application event. The bundle events carry a [`BundleRef`] to the
//! bundle changing phase.
use crate::bundle::BundleRef;
use crate::event::Event;

/// Emitted once every bundle is hooked, before the first `prepare`.
#[derive(Debug, Clone, Default)]
pub struct KernelBeforeInitEvent;

/// Emitted after the last bundle's `init`, once the kernel is frozen.
#[derive(Debug, Clone, Default)]
pub struct KernelAfterInitEvent;

#[derive(Debug, Clone)]
pub struct BundleBeforePrepareEvent {
    pub bundle: BundleRef,
}

#[derive(Debug, Clone)]
pub struct BundleAfterPrepareEvent {
    pub bundle: BundleRef,
}

#[derive(Debug, Clone)]
pub struct BundleBeforeInitEvent {
    pub bundle: BundleRef,
}

#[derive(Debug, Clone)]
pub struct BundleAfterInitEvent {
    pub bundle: BundleRef,
}

impl Event for KernelBeforeInitEvent {}
impl Event for KernelAfterInitEvent {}
impl Event for BundleBeforePrepareEvent {}
impl Event for BundleAfterPrepareEvent {}
impl Event for BundleBeforeInitEvent {}
impl Event for BundleAfterInitEvent {}
