
#[cfg(test)]
mod tests {
    use crate::kernel::constants::{APP_NAME, APP_VERSION};
    use crate::kernel::error::Error;
    use crate::kernel::KernelPhase;

    #[test]
    fn test_kernel_phase_ordering() {
        assert!(KernelPhase::Dormant < KernelPhase::BundleSetup);
        assert!(KernelPhase::BundleSetup < KernelPhase::Hooking);
        assert!(KernelPhase::Hooking < KernelPhase::Preparing);
        assert!(KernelPhase::Preparing < KernelPhase::Initialising);
        assert!(KernelPhase::Initialising < KernelPhase::Initialised);
        assert!(KernelPhase::Initialised.is_frozen());
        assert_eq!(KernelPhase::default(), KernelPhase::Dormant);
    }

    #[test]
    fn test_error_from_str() {
        let err: Error = "plain failure".into();
        assert!(matches!(err, Error::Other(ref message) if message == "plain failure"));
        assert_eq!(err.to_string(), "Error: plain failure");
    }

    #[test]
    fn test_lifecycle_error_display() {
        let err = Error::lifecycle(KernelPhase::Hooking, "not now");
        assert_eq!(err.to_string(), "Kernel lifecycle error during Hooking: not now");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_app_identity_constants() {
        assert_eq!(APP_NAME, "modkit");
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!APP_VERSION.is_empty());
    }
}
