//! Eager construction of services during a bundle's lifecycle.
//!
//! A [`WarmupTarget`] names a service and how to bring it up: resolve it
//! only, resolve it and run its [`Initializable::init`], or resolve a
//! [`Listener`] and let it subscribe on the kernel's [`EventManager`].
use std::fmt;

use async_trait::async_trait;

use crate::container::{Container, Injectable};
use crate::event::{BoxFuture, EventManager, Listener};
use crate::kernel::error::Result;
use crate::utils::short_type_name;

/// Services with an asynchronous start-up step.
#[async_trait]
pub trait Initializable: Send + Sync + 'static {
    async fn init(&self) -> Result<()>;
}

type WarmupFn = for<'a> fn(&'a Container) -> BoxFuture<'a>;

/// A service to bring up during [`warmup`](crate::bundle::BundleHost::warmup).
#[derive(Clone, Copy)]
pub struct WarmupTarget {
    name: &'static str,
    run: WarmupFn,
}

impl WarmupTarget {
    /// Resolve `T`, constructing and caching it if needed.
    pub fn service<T: Injectable>() -> Self {
        Self {
            name: short_type_name::<T>(),
            run: warm_service::<T>,
        }
    }

    /// Resolve `T` and await its `init`.
    pub fn initializable<T: Injectable + Initializable>() -> Self {
        Self {
            name: short_type_name::<T>(),
            run: warm_initializable::<T>,
        }
    }

    /// Look up whatever is bound under `T` (typically a `dyn Trait`
    /// capability) and await its `init`.
    pub fn bound<T: ?Sized + Initializable>() -> Self {
        Self {
            name: short_type_name::<T>(),
            run: warm_bound::<T>,
        }
    }

    /// Resolve the listener `L` and let it register its handlers.
    pub fn listener<L: Listener + Injectable>() -> Self {
        Self {
            name: short_type_name::<L>(),
            run: warm_listener::<L>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for WarmupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WarmupTarget").field(&self.name).finish()
    }
}

pub(crate) async fn run(bundle: &str, container: &Container, targets: &[WarmupTarget]) -> Result<()> {
    for target in targets {
        log::debug!("Bundle {} warming up {}", bundle, target.name);
        if let Err(err) = (target.run)(container).await {
            log::error!("Warm-up of {} for bundle {} failed: {}", target.name, bundle, err);
            return Err(err);
        }
    }
    Ok(())
}

fn warm_service<T: Injectable>(container: &Container) -> BoxFuture<'_> {
    Box::pin(async move { container.resolve::<T>().map(|_| ()) })
}

fn warm_initializable<T: Injectable + Initializable>(container: &Container) -> BoxFuture<'_> {
    Box::pin(async move {
        let service = container.resolve::<T>()?;
        service.init().await
    })
}

fn warm_bound<T: ?Sized + Initializable>(container: &Container) -> BoxFuture<'_> {
    Box::pin(async move {
        let service = container.get::<T>()?;
        service.init().await
    })
}

fn warm_listener<L: Listener + Injectable>(container: &Container) -> BoxFuture<'_> {
    Box::pin(async move {
        let listener = container.resolve::<L>()?;
        let events = container.get::<EventManager>()?;
        listener.init(&events).await
    })
}
