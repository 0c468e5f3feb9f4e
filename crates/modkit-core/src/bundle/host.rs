use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::bundle::context::BundleContext;
use crate::bundle::error::BundleSystemError;
use crate::bundle::phase::BundlePhase;
use crate::bundle::traits::{Bundle, BundleId};
use crate::bundle::warmup::{self, WarmupTarget};
use crate::container::Container;
use crate::event::AsAny;
use crate::kernel::error::Result;
use crate::kernel::{Kernel, WeakKernel};
use crate::utils::merge_into;

/// A registered bundle together with its lifecycle state.
///
/// The kernel binds each host in its container under `BundleHost<B>`, and
/// [`Kernel::bundle`](crate::kernel::Kernel::bundle) hands out typed access.
pub struct BundleHost<B: Bundle> {
    bundle: B,
    supplied_config: Value,
    phase: RwLock<BundlePhase>,
    config: RwLock<Option<B::Config>>,
    kernel: OnceLock<WeakKernel>,
}

impl<B: Bundle> BundleHost<B> {
    pub fn new(bundle: B) -> Self {
        Self::with_config(bundle, Value::Object(Map::new()))
    }

    /// Wrap `bundle` with a supplied (possibly partial) configuration.
    pub fn with_config(bundle: B, config: Value) -> Self {
        Self {
            bundle,
            supplied_config: config,
            phase: RwLock::new(BundlePhase::Dormant),
            config: RwLock::new(None),
            kernel: OnceLock::new(),
        }
    }

    pub fn bundle(&self) -> &B {
        &self.bundle
    }

    pub fn id(&self) -> BundleId {
        BundleId::of::<B>()
    }

    pub fn name(&self) -> &'static str {
        self.bundle.name()
    }

    pub fn phase(&self) -> BundlePhase {
        *read(&self.phase)
    }

    /// Move to `phase`. Fails once the bundle is frozen.
    pub fn set_phase(&self, phase: BundlePhase) -> Result<()> {
        let mut current = write(&self.phase);
        if current.is_frozen() {
            return Err(BundleSystemError::FrozenBundle {
                bundle: self.name().to_string(),
                attempted: phase,
            }
            .into());
        }
        log::debug!("Bundle {}: {} -> {}", self.name(), *current, phase);
        *current = phase;
        Ok(())
    }

    /// The resolved configuration. Available once setup has run.
    pub fn config(&self) -> Result<B::Config> {
        read(&self.config).clone().ok_or_else(|| {
            BundleSystemError::ConfigUnavailable {
                bundle: self.name().to_string(),
            }
            .into()
        })
    }

    /// Deep-merge `partial` into the current configuration.
    pub fn update_config(&self, partial: Value) -> Result<()> {
        self.ensure_config_unlocked()?;
        let mut slot = write(&self.config);
        let current = slot.as_ref().ok_or_else(|| BundleSystemError::ConfigUnavailable {
            bundle: self.name().to_string(),
        })?;
        let mut value = serde_json::to_value(current).map_err(|source| {
            BundleSystemError::ConfigSerialization {
                bundle: self.name().to_string(),
                source,
            }
        })?;
        merge_into(&mut value, partial);
        *slot = Some(self.deserialize_config(value)?);
        Ok(())
    }

    /// Replace the configuration wholesale.
    pub fn set_config(&self, config: B::Config) -> Result<()> {
        self.ensure_config_unlocked()?;
        *write(&self.config) = Some(config);
        Ok(())
    }

    /// The owning kernel, while it is alive. Set by setup.
    pub fn kernel(&self) -> Result<Kernel> {
        self.kernel
            .get()
            .and_then(WeakKernel::upgrade)
            .ok_or_else(|| {
                BundleSystemError::KernelUnavailable {
                    bundle: self.name().to_string(),
                }
                .into()
            })
    }

    /// Look up a service in the owning kernel's container.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.kernel()?.container().get::<T>()
    }

    /// Resolve each target from the container in order, running its `init`
    /// where it has one.
    pub async fn warmup(&self, targets: &[WarmupTarget]) -> Result<()> {
        let kernel = self.kernel()?;
        warmup::run(self.name(), kernel.container(), targets).await
    }

    fn ensure_config_unlocked(&self) -> Result<()> {
        if let Some(locked_from) = self.bundle.config_locked_from() {
            let phase = self.phase();
            if phase >= locked_from {
                return Err(BundleSystemError::ConfigLocked {
                    bundle: self.name().to_string(),
                    phase,
                }
                .into());
            }
        }
        Ok(())
    }

    fn deserialize_config(&self, value: Value) -> Result<B::Config> {
        serde_json::from_value(value).map_err(|source| {
            BundleSystemError::ConfigDeserialization {
                bundle: self.name().to_string(),
                source,
            }
            .into()
        })
    }

    fn context<'a>(&'a self, kernel: &'a Kernel) -> BundleContext<'a, B> {
        BundleContext::new(self, kernel)
    }
}

impl<B: Bundle> fmt::Debug for BundleHost<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleHost")
            .field("bundle", &self.name())
            .field("phase", &self.phase())
            .field("config", &*read(&self.config))
            .finish()
    }
}

/// Object-safe view of a [`BundleHost`], driven by the kernel.
#[async_trait]
pub(crate) trait BundleSlot: AsAny {
    fn id(&self) -> BundleId;
    fn name(&self) -> &'static str;
    fn phase(&self) -> BundlePhase;
    fn set_phase(&self, phase: BundlePhase) -> Result<()>;
    fn config_value(&self) -> Result<Value>;
    fn update_config_value(&self, partial: Value) -> Result<()>;
    fn bind_into(self: Arc<Self>, container: &Container);

    async fn setup(&self, kernel: &Kernel) -> Result<()>;
    async fn hook(&self, kernel: &Kernel) -> Result<()>;
    async fn prepare(&self, kernel: &Kernel) -> Result<()>;
    async fn init(&self, kernel: &Kernel) -> Result<()>;
}

#[async_trait]
impl<B: Bundle> BundleSlot for BundleHost<B> {
    fn id(&self) -> BundleId {
        BundleHost::id(self)
    }

    fn name(&self) -> &'static str {
        BundleHost::name(self)
    }

    fn phase(&self) -> BundlePhase {
        BundleHost::phase(self)
    }

    fn set_phase(&self, phase: BundlePhase) -> Result<()> {
        BundleHost::set_phase(self, phase)
    }

    fn config_value(&self) -> Result<Value> {
        let config = self.config()?;
        serde_json::to_value(config).map_err(|source| {
            BundleSystemError::ConfigSerialization {
                bundle: self.name().to_string(),
                source,
            }
            .into()
        })
    }

    fn update_config_value(&self, partial: Value) -> Result<()> {
        self.update_config(partial)
    }

    fn bind_into(self: Arc<Self>, container: &Container) {
        container.bind::<BundleHost<B>>(self);
    }

    async fn setup(&self, kernel: &Kernel) -> Result<()> {
        // Only the first setup attaches a kernel.
        let _ = self.kernel.set(kernel.downgrade());

        let mut merged = Value::Object(Map::new());
        merge_into(&mut merged, self.bundle.default_config());
        merge_into(&mut merged, self.supplied_config.clone());
        let config = self.deserialize_config(merged)?;
        *write(&self.config) = Some(config.clone());

        self.bundle.validate(&config).await?;

        for dependency in self.bundle.dependencies() {
            if !kernel.has_bundle_id(&dependency) {
                return Err(BundleSystemError::DependencyMissing {
                    bundle: self.name().to_string(),
                    dependency: dependency.name().to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    async fn hook(&self, kernel: &Kernel) -> Result<()> {
        self.bundle.hook(&self.context(kernel)).await
    }

    async fn prepare(&self, kernel: &Kernel) -> Result<()> {
        self.bundle.prepare(&self.context(kernel)).await
    }

    async fn init(&self, kernel: &Kernel) -> Result<()> {
        self.bundle.init(&self.context(kernel)).await
    }
}

/// Shared, type-erased handle to a registered bundle.
///
/// Carried by the bundle lifecycle events; use [`BundleRef::is`] to match a
/// bundle type and [`BundleRef::downcast`] for typed access.
#[derive(Clone)]
pub struct BundleRef {
    slot: Arc<dyn BundleSlot>,
}

impl BundleRef {
    pub fn new<B: Bundle>(host: BundleHost<B>) -> Self {
        Self::from_arc(Arc::new(host))
    }

    pub fn from_arc<B: Bundle>(host: Arc<BundleHost<B>>) -> Self {
        Self { slot: host }
    }

    pub fn id(&self) -> BundleId {
        self.slot.id()
    }

    pub fn name(&self) -> &'static str {
        self.slot.name()
    }

    pub fn phase(&self) -> BundlePhase {
        self.slot.phase()
    }

    pub fn is<B: Bundle>(&self) -> bool {
        self.id() == BundleId::of::<B>()
    }

    pub fn downcast<B: Bundle>(&self) -> Option<Arc<BundleHost<B>>> {
        self.slot.clone().into_any_arc().downcast::<BundleHost<B>>().ok()
    }

    /// The bundle's current configuration as JSON.
    pub fn config_value(&self) -> Result<Value> {
        self.slot.config_value()
    }

    /// Deep-merge `partial` into the bundle's configuration.
    pub fn update_config(&self, partial: Value) -> Result<()> {
        self.slot.update_config_value(partial)
    }

    pub(crate) fn slot(&self) -> &dyn BundleSlot {
        &*self.slot
    }

    pub(crate) fn bind_into(&self, container: &Container) {
        self.slot.clone().bind_into(container);
    }
}

impl<B: Bundle> From<BundleHost<B>> for BundleRef {
    fn from(host: BundleHost<B>) -> Self {
        BundleRef::new(host)
    }
}

impl fmt::Debug for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleRef")
            .field("bundle", &self.name())
            .field("phase", &self.phase())
            .finish()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
