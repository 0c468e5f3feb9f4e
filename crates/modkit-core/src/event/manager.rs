use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::event::dispatcher::{ListenerEntry, ListenerRegistry};
use crate::event::{Event, GlobalHandler, Handler, ListenerOptions};
use crate::kernel::error::Result;

/// Shared event manager. Clones share the same listener lists.
///
/// The registry lock is only held while registering or while taking the
/// dispatch snapshot, never across a handler's `.await`, so handlers may
/// add or remove listeners (the change applies from the next emission).
#[derive(Clone, Default)]
pub struct EventManager {
    registry: Arc<RwLock<ListenerRegistry>>,
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("registry", &*self.read())
            .finish()
    }
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`.
    pub fn add_listener<E: Event>(&self, handler: Handler<E>, options: ListenerOptions<E>) -> &Self {
        log::debug!(
            "Adding listener for {} (order {})",
            crate::utils::short_type_name::<E>(),
            options.order
        );
        self.write().add_listener(handler, options);
        self
    }

    /// Register `handler` for every emitted event.
    pub fn add_global_listener(&self, handler: GlobalHandler, options: ListenerOptions<dyn Event>) -> &Self {
        log::debug!("Adding global listener (order {})", options.order);
        self.write().add_global_listener(handler, options);
        self
    }

    /// Shorthand for [`add_listener`](Self::add_listener) with a synchronous
    /// callback and default options.
    pub fn on<E, F>(&self, callback: F) -> Handler<E>
    where
        E: Event,
        F: Fn(&E) -> Result<()> + Send + Sync + 'static,
    {
        let handler = Handler::sync(callback);
        self.add_listener(handler.clone(), ListenerOptions::default());
        handler
    }

    /// Remove every registration of `handler` for `E`. Unknown handlers are
    /// ignored.
    pub fn remove_listener<E: Event>(&self, handler: &Handler<E>) -> &Self {
        let removed = self.write().remove_listener(handler);
        log::debug!(
            "Removed {} listener(s) for {}",
            removed,
            crate::utils::short_type_name::<E>()
        );
        self
    }

    pub fn remove_global_listener(&self, handler: &GlobalHandler) -> &Self {
        let removed = self.write().remove_global_listener(handler);
        log::debug!("Removed {} global listener(s)", removed);
        self
    }

    /// Validate `event`, then run the matching listeners in order.
    ///
    /// Nothing runs if validation fails. The first listener error stops the
    /// dispatch and is returned as is.
    pub async fn emit<E: Event>(&self, event: E) -> Result<()> {
        self.emit_shared(Arc::new(event)).await
    }

    /// [`emit`](Self::emit) for an event that is already shared.
    pub async fn emit_shared<E: Event>(&self, event: Arc<E>) -> Result<()> {
        self.dispatch(TypeId::of::<E>(), event).await
    }

    /// [`emit`](Self::emit) for a type-erased event, routed by its runtime type.
    pub async fn emit_dyn(&self, event: Arc<dyn Event>) -> Result<()> {
        // Deref first: `Arc<dyn Event>` is itself `Any`.
        let type_id = (*event).as_any().type_id();
        self.dispatch(type_id, event).await
    }

    async fn dispatch(&self, type_id: TypeId, event: Arc<dyn Event>) -> Result<()> {
        if let Err(err) = event.validate().await {
            log::warn!("Event {} failed validation: {}", event.name(), err);
            return Err(err);
        }

        let entries: Vec<Arc<ListenerEntry>> = self.read().dispatch_list(type_id);
        log::debug!("Emitting {} to {} listener(s)", event.name(), entries.len());
        for entry in entries {
            if !entry.accepts(&*event) {
                continue;
            }
            if let Err(err) = entry.invoke(event.clone()).await {
                log::error!(
                    "Listener (order {}) failed while handling {}: {}",
                    entry.order(),
                    event.name(),
                    err
                );
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn listener_count<E: Event>(&self) -> usize {
        self.read().listener_count(TypeId::of::<E>())
    }

    pub fn global_listener_count(&self) -> usize {
        self.read().global_listener_count()
    }

    pub fn has_listeners<E: Event>(&self) -> bool {
        self.listener_count::<E>() > 0 || self.global_listener_count() > 0
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, ListenerRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListenerRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}
