use std::any::TypeId;
use std::sync::Arc;

use crate::event::dispatcher::ListenerRegistry;
use crate::event::{Event, Handler, ListenerOptions};

#[derive(Debug)]
struct Alpha;

impl Event for Alpha {}

#[derive(Debug)]
struct Beta;

impl Event for Beta {}

fn noop<E: ?Sized + Send + Sync + 'static>() -> Handler<E> {
    Handler::sync(|_event: &E| Ok(()))
}

fn orders(registry: &ListenerRegistry, type_id: TypeId) -> Vec<i32> {
    registry
        .dispatch_list(type_id)
        .iter()
        .map(|entry| entry.order())
        .collect()
}

#[test]
fn test_dispatch_list_merges_globals_sorted() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener(noop::<Alpha>(), ListenerOptions::ordered(5));
    registry.add_listener(noop::<Alpha>(), ListenerOptions::ordered(-2));
    registry.add_global_listener(noop::<dyn Event>(), ListenerOptions::ordered(0));
    registry.add_global_listener(noop::<dyn Event>(), ListenerOptions::ordered(10));

    assert_eq!(orders(&registry, TypeId::of::<Alpha>()), vec![-2, 0, 5, 10]);
    // Types without specific listeners still get the globals.
    assert_eq!(orders(&registry, TypeId::of::<Beta>()), vec![0, 10]);
}

#[test]
fn test_dispatch_list_is_a_snapshot() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener(noop::<Alpha>(), ListenerOptions::default());
    let snapshot = registry.dispatch_list(TypeId::of::<Alpha>());

    registry.add_listener(noop::<Alpha>(), ListenerOptions::default());
    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.dispatch_list(TypeId::of::<Alpha>()).len(), 2);
}

#[test]
fn test_remove_listener_counts_and_drops_empty_lists() {
    let mut registry = ListenerRegistry::new();
    let handler = noop::<Alpha>();
    registry.add_listener(handler.clone(), ListenerOptions::default());
    registry.add_listener(handler.clone(), ListenerOptions::ordered(3));

    assert_eq!(registry.remove_listener(&handler), 2);
    assert_eq!(registry.listener_count(TypeId::of::<Alpha>()), 0);
    assert_eq!(registry.remove_listener(&handler), 0);
    assert_eq!(registry.remove_listener(&noop::<Beta>()), 0);
    assert!(format!("{:?}", registry).contains("event_types: 0"));
}

#[test]
fn test_remove_global_listener_by_identity() {
    let mut registry = ListenerRegistry::new();
    let kept = noop::<dyn Event>();
    let dropped = noop::<dyn Event>();
    registry.add_global_listener(kept.clone(), ListenerOptions::default());
    registry.add_global_listener(dropped.clone(), ListenerOptions::default());

    assert_eq!(registry.remove_global_listener(&dropped), 1);
    assert_eq!(registry.global_listener_count(), 1);
    assert_eq!(registry.remove_global_listener(&kept), 1);
    assert_eq!(registry.global_listener_count(), 0);
}

#[test]
fn test_entry_filter_rejects_other_events() {
    let mut registry = ListenerRegistry::new();
    registry.add_global_listener(
        noop::<dyn Event>(),
        ListenerOptions::<dyn Event>::default().filter(|event| event.is::<Beta>()),
    );
    let entries = registry.dispatch_list(TypeId::of::<Alpha>());

    let alpha: Arc<dyn Event> = Arc::new(Alpha);
    let beta: Arc<dyn Event> = Arc::new(Beta);
    assert!(!entries[0].accepts(&*alpha));
    assert!(entries[0].accepts(&*beta));
}

#[test]
fn test_clear() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener(noop::<Alpha>(), ListenerOptions::default());
    registry.add_global_listener(noop::<dyn Event>(), ListenerOptions::default());
    registry.clear();
    assert!(registry.dispatch_list(TypeId::of::<Alpha>()).is_empty());
}
