// Event system test module
#[cfg(test)]
mod dispatcher_tests;

#[cfg(test)]
mod tests {
    use crate::event::{Event, ListenerOptions};

    #[derive(Debug)]
    struct Ping;

    impl Event for Ping {}

    #[test]
    fn test_event_name_defaults_to_type_name() {
        assert_eq!(Ping.name(), "Ping");
    }

    #[test]
    fn test_listener_options_default_order() {
        let options: ListenerOptions<Ping> = ListenerOptions::default();
        assert_eq!(options.order, 0);
        assert_eq!(ListenerOptions::<Ping>::ordered(-3).order, -3);
    }

    #[test]
    fn test_dyn_event_downcast() {
        let event: Box<dyn Event> = Box::new(Ping);
        assert!(event.is::<Ping>());
        assert!(event.downcast_ref::<Ping>().is_some());
    }
}
