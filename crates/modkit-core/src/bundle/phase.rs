use std::fmt;

/// Per-bundle lifecycle phases. A bundle that reached
/// [`BundlePhase::Initialised`] is frozen and rejects further phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BundlePhase {
    #[default]
    Dormant,
    Setup,
    Hooking,
    Hooked,
    Preparing,
    Prepared,
    Initialising,
    Initialised,
}

impl BundlePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundlePhase::Dormant => "Dormant",
            BundlePhase::Setup => "Setup",
            BundlePhase::Hooking => "Hooking",
            BundlePhase::Hooked => "Hooked",
            BundlePhase::Preparing => "Preparing",
            BundlePhase::Prepared => "Prepared",
            BundlePhase::Initialising => "Initialising",
            BundlePhase::Initialised => "Initialised",
        }
    }

    pub fn is_frozen(&self) -> bool {
        *self == BundlePhase::Initialised
    }
}

impl fmt::Display for BundlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
