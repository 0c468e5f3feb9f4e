use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::event::{BoxFuture, Event, GlobalHandler, Handler, ListenerOptions};

type ErasedFilter = Arc<dyn Fn(&(dyn Event + 'static)) -> bool + Send + Sync>;
type ErasedCallback = Arc<dyn Fn(Arc<dyn Event>) -> BoxFuture<'static> + Send + Sync>;

/// A registered handler, type-erased so specific and global entries can be
/// merged into one dispatch sequence.
pub struct ListenerEntry {
    order: i32,
    identity: usize,
    filter: Option<ErasedFilter>,
    callback: ErasedCallback,
}

impl ListenerEntry {
    fn typed<E: Event>(handler: Handler<E>, options: ListenerOptions<E>) -> Self {
        let (order, filter) = options.into_parts();
        let identity = handler.identity();
        let filter = filter.map(|filter| -> ErasedFilter {
            Arc::new(move |event: &(dyn Event + 'static)| event.downcast_ref::<E>().map_or(false, |e| filter(e)))
        });
        let callback: ErasedCallback = Arc::new(move |event: Arc<dyn Event>| -> BoxFuture<'static> {
            match event.into_any_arc().downcast::<E>() {
                Ok(event) => handler.call(event),
                // Entries are keyed by TypeId, so this arm is never taken.
                Err(_) => Box::pin(async { Ok(()) }),
            }
        });
        Self {
            order,
            identity,
            filter,
            callback,
        }
    }

    fn global(handler: GlobalHandler, options: ListenerOptions<dyn Event>) -> Self {
        let (order, filter) = options.into_parts();
        let identity = handler.identity();
        let filter = filter.map(|filter| -> ErasedFilter { filter });
        let callback: ErasedCallback =
            Arc::new(move |event: Arc<dyn Event>| -> BoxFuture<'static> { handler.call(event) });
        Self {
            order,
            identity,
            filter,
            callback,
        }
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Whether the entry's filter (if any) lets `event` through.
    pub fn accepts(&self, event: &(dyn Event + 'static)) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    pub fn invoke(&self, event: Arc<dyn Event>) -> BoxFuture<'static> {
        (self.callback)(event)
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("order", &self.order)
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

/// Listener lists owned by an [`EventManager`](crate::event::EventManager).
///
/// Both the per-type lists and the global list are kept sorted by `order`.
/// The sort is stable, so entries with equal order keep registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<TypeId, Vec<Arc<ListenerEntry>>>,
    global_listeners: Vec<Arc<ListenerEntry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<E: Event>(&mut self, handler: Handler<E>, options: ListenerOptions<E>) {
        let entries = self.listeners.entry(TypeId::of::<E>()).or_default();
        entries.push(Arc::new(ListenerEntry::typed(handler, options)));
        entries.sort_by_key(|entry| entry.order);
    }

    pub fn add_global_listener(&mut self, handler: GlobalHandler, options: ListenerOptions<dyn Event>) {
        self.global_listeners
            .push(Arc::new(ListenerEntry::global(handler, options)));
        self.global_listeners.sort_by_key(|entry| entry.order);
    }

    /// Drop every entry registered for `E` with this handler. Returns how
    /// many were removed.
    pub fn remove_listener<E: Event>(&mut self, handler: &Handler<E>) -> usize {
        let type_id = TypeId::of::<E>();
        let removed = match self.listeners.get_mut(&type_id) {
            Some(entries) => remove_identity(entries, handler.identity()),
            None => 0,
        };
        if self.listeners.get(&type_id).map_or(false, Vec::is_empty) {
            self.listeners.remove(&type_id);
        }
        removed
    }

    pub fn remove_global_listener(&mut self, handler: &GlobalHandler) -> usize {
        remove_identity(&mut self.global_listeners, handler.identity())
    }

    /// Entries to run for an event of type `type_id`, in dispatch order.
    ///
    /// Global entries are appended after the type-specific ones before the
    /// stable sort, so a specific entry runs before a global one of equal
    /// order.
    pub fn dispatch_list(&self, type_id: TypeId) -> Vec<Arc<ListenerEntry>> {
        let mut entries = self.listeners.get(&type_id).cloned().unwrap_or_default();
        if !self.global_listeners.is_empty() {
            entries.extend(self.global_listeners.iter().cloned());
            entries.sort_by_key(|entry| entry.order);
        }
        entries
    }

    pub fn listener_count(&self, type_id: TypeId) -> usize {
        self.listeners.get(&type_id).map_or(0, Vec::len)
    }

    pub fn global_listener_count(&self) -> usize {
        self.global_listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
        self.global_listeners.clear();
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let typed: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("ListenerRegistry")
            .field("event_types", &self.listeners.len())
            .field("listeners", &typed)
            .field("global_listeners", &self.global_listeners.len())
            .finish()
    }
}

fn remove_identity(entries: &mut Vec<Arc<ListenerEntry>>, identity: usize) -> usize {
    let before = entries.len();
    entries.retain(|entry| entry.identity != identity);
    before - entries.len()
}
