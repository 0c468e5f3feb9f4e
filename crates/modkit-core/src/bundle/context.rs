use std::sync::Arc;

use serde_json::Value;

use crate::bundle::host::BundleHost;
use crate::bundle::phase::BundlePhase;
use crate::bundle::traits::Bundle;
use crate::bundle::warmup::{self, WarmupTarget};
use crate::container::{Container, Injectable, Key};
use crate::event::EventManager;
use crate::kernel::error::Result;
use crate::kernel::Kernel;

/// What a bundle sees while one of its lifecycle hooks runs: its own state
/// and the kernel driving it.
pub struct BundleContext<'a, B: Bundle> {
    host: &'a BundleHost<B>,
    kernel: &'a Kernel,
}

impl<'a, B: Bundle> BundleContext<'a, B> {
    pub(crate) fn new(host: &'a BundleHost<B>, kernel: &'a Kernel) -> Self {
        Self { host, kernel }
    }

    pub fn host(&self) -> &BundleHost<B> {
        self.host
    }

    pub fn kernel(&self) -> &Kernel {
        self.kernel
    }

    pub fn container(&self) -> &Container {
        self.kernel.container()
    }

    /// The event manager currently bound in the container.
    pub fn events(&self) -> Result<Arc<EventManager>> {
        self.kernel.event_manager()
    }

    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.container().get::<T>()
    }

    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, key: &Key<T>) -> Result<Arc<T>> {
        self.container().get_named(key)
    }

    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.container().resolve::<T>()
    }

    /// Kernel parameter `name`, without the `%` delimiters.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.kernel.parameters().get(name)
    }

    pub fn phase(&self) -> BundlePhase {
        self.host.phase()
    }

    pub fn config(&self) -> Result<B::Config> {
        self.host.config()
    }

    pub fn update_config(&self, partial: Value) -> Result<()> {
        self.host.update_config(partial)
    }

    pub fn set_config(&self, config: B::Config) -> Result<()> {
        self.host.set_config(config)
    }

    /// See [`BundleHost::warmup`].
    pub async fn warmup(&self, targets: &[WarmupTarget]) -> Result<()> {
        warmup::run(self.host.name(), self.container(), targets).await
    }
}
