
#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::bundle::{Bundle, BundleId, BundlePhase};

    struct Alpha;

    impl Bundle for Alpha {
        type Config = Value;
    }

    struct Beta;

    impl Bundle for Beta {
        type Config = Value;
    }

    #[test]
    fn test_bundle_id_compares_by_type() {
        assert_eq!(BundleId::of::<Alpha>(), BundleId::of::<Alpha>());
        assert_ne!(BundleId::of::<Alpha>(), BundleId::of::<Beta>());
        assert_eq!(BundleId::of::<Alpha>().name(), "Alpha");
        assert_eq!(BundleId::of::<Beta>().to_string(), "Beta");
    }

    #[test]
    fn test_bundle_defaults() {
        assert_eq!(Alpha.name(), "Alpha");
        assert_eq!(Alpha.default_config(), serde_json::json!({}));
        assert!(Alpha.dependencies().is_empty());
        assert_eq!(Alpha.config_locked_from(), None);
    }

    #[test]
    fn test_bundle_phase_ordering() {
        let phases = [
            BundlePhase::Dormant,
            BundlePhase::Setup,
            BundlePhase::Hooking,
            BundlePhase::Hooked,
            BundlePhase::Preparing,
            BundlePhase::Prepared,
            BundlePhase::Initialising,
            BundlePhase::Initialised,
        ];
        assert!(phases.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(BundlePhase::Initialised.is_frozen());
        assert!(!BundlePhase::Prepared.is_frozen());
        assert_eq!(BundlePhase::Hooked.to_string(), "Hooked");
    }
}
