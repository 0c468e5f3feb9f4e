use std::fmt;

/// Kernel lifecycle phases, in the order [`Kernel::init`](crate::kernel::Kernel::init)
/// walks them. The kernel never skips a phase or moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum KernelPhase {
    /// Accepting bundles; `init` has not been called.
    #[default]
    Dormant,
    BundleSetup,
    Hooking,
    Preparing,
    Initialising,
    /// Frozen.
    Initialised,
}

impl KernelPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            KernelPhase::Dormant => "Dormant",
            KernelPhase::BundleSetup => "BundleSetup",
            KernelPhase::Hooking => "Hooking",
            KernelPhase::Preparing => "Preparing",
            KernelPhase::Initialising => "Initialising",
            KernelPhase::Initialised => "Initialised",
        }
    }

    pub fn is_frozen(&self) -> bool {
        *self == KernelPhase::Initialised
    }
}

impl fmt::Display for KernelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
