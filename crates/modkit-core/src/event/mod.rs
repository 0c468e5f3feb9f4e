//! # Modkit Core Event System
//!
//! Ordered, validation-gated publish/subscribe used both for kernel lifecycle
//! notifications and for application events.
//!
//! - **[`Event`]**: implemented by every event payload. Routing uses the
//!   concrete type; [`Event::name`] is for diagnostics only.
//! - **[`Handler`]**: a shareable callback. Handlers are compared by identity,
//!   so the clone used to register a handler can later remove it.
//! - **[`EventManager`]**: holds per-type and global listener lists, each
//!   kept sorted by [`ListenerOptions::order`], and dispatches emitted events
//!   to them one at a time.
//! - **[`Listener`]**: services that register their handlers during warm-up.
//! - **[`types`]**: the kernel lifecycle events.
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod manager;
pub mod types;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::utils::short_type_name;

/// Future returned by event handlers.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Upcasting helpers, implemented for every sized `'static` type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Core event trait
#[async_trait]
pub trait Event: AsAny + fmt::Debug {
    /// Declared type name of the event
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Checked before any listener runs; an error aborts the emission.
    async fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl dyn Event {
    /// Downcast to the concrete event type.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    pub fn is<E: Event>(&self) -> bool {
        self.as_any().is::<E>()
    }
}

/// Shareable event callback, identified by the allocation it wraps.
///
/// `E` is a concrete event type for type-specific listeners and `dyn Event`
/// for global listeners.
pub struct Handler<E: ?Sized> {
    callback: Arc<dyn Fn(Arc<E>) -> BoxFuture<'static> + Send + Sync>,
}

/// Handler receiving every emitted event.
pub type GlobalHandler = Handler<dyn Event>;

impl<E: ?Sized + Send + Sync + 'static> Handler<E> {
    /// Wrap an async callback.
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            callback: Arc::new(move |event: Arc<E>| -> BoxFuture<'static> {
                Box::pin(callback(event))
            }),
        }
    }

    /// Wrap a synchronous callback.
    pub fn sync<F>(callback: F) -> Self
    where
        F: Fn(&E) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(move |event: Arc<E>| -> BoxFuture<'static> {
                let result = callback(&*event);
                Box::pin(async move { result })
            }),
        }
    }

    pub(crate) fn call(&self, event: Arc<E>) -> BoxFuture<'static> {
        (self.callback)(event)
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.callback) as *const () as usize
    }

    /// Whether both values wrap the same callback.
    pub fn same_as(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<E: ?Sized> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// Registration options for a listener.
pub struct ListenerOptions<E: ?Sized> {
    /// Lower values run first. Defaults to 0.
    pub order: i32,
    filter: Option<Arc<dyn Fn(&E) -> bool + Send + Sync>>,
}

impl<E: ?Sized> ListenerOptions<E> {
    pub fn new() -> Self {
        Self {
            order: 0,
            filter: None,
        }
    }

    pub fn ordered(order: i32) -> Self {
        Self::new().order(order)
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Only invoke the handler for events accepted by `filter`.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub(crate) fn into_parts(self) -> (i32, Option<Arc<dyn Fn(&E) -> bool + Send + Sync>>) {
        (self.order, self.filter)
    }
}

impl<E: ?Sized> Default for ListenerOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> fmt::Debug for ListenerOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerOptions")
            .field("order", &self.order)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

pub use dispatcher::ListenerRegistry;
pub use error::EventSystemError;
pub use listener::Listener;
pub use manager::EventManager;
pub use types::{
    BundleAfterInitEvent, BundleAfterPrepareEvent, BundleBeforeInitEvent,
    BundleBeforePrepareEvent, KernelAfterInitEvent, KernelBeforeInitEvent,
};

#[cfg(test)]
mod tests;
