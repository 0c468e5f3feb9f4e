/// Application name
pub const APP_NAME: &str = "modkit";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parameter toggling debug behaviour
pub const DEBUG_PARAMETER: &str = "debug";

/// Parameter naming the execution context
pub const CONTEXT_PARAMETER: &str = "context";

/// Default execution context
pub const DEFAULT_CONTEXT: &str = "server";
