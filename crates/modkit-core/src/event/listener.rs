use async_trait::async_trait;

use crate::event::EventManager;
use crate::kernel::error::Result;

/// A service whose only job is to subscribe handlers.
///
/// Listeners are constructed and initialised through bundle warm-up (see
/// [`WarmupTarget::listener`](crate::bundle::WarmupTarget::listener)), which
/// hands them the kernel's event manager.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Register this listener's handlers on `events`.
    async fn init(&self, events: &EventManager) -> Result<()>;
}
