use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use serde_json::Value;

use crate::bundle::{Bundle, BundleHost, BundleId, BundlePhase, BundleRef, BundleSystemError};
use crate::container::{keys, Container, Injectable, Key};
use crate::event::{
    BundleAfterInitEvent, BundleAfterPrepareEvent, BundleBeforeInitEvent,
    BundleBeforePrepareEvent, EventManager, KernelAfterInitEvent, KernelBeforeInitEvent,
};
use crate::kernel::constants::{APP_NAME, APP_VERSION};
use crate::kernel::error::{Error, Result};
use crate::kernel::parameters::Parameters;
use crate::kernel::phase::KernelPhase;

struct KernelInner {
    phase: RwLock<KernelPhase>,
    bundles: RwLock<Vec<BundleRef>>,
    parameters: Parameters,
    container: Container,
}

/// The orchestrator: owns the container, the parameters and the ordered
/// bundle list, and drives every bundle through start-up in
/// [`init`](Kernel::init).
///
/// `Kernel` is a cheap handle; clones refer to the same kernel.
#[derive(Clone)]
pub struct Kernel {
    inner: Arc<KernelInner>,
}

/// Non-owning kernel handle, held by bundles and container bindings.
#[derive(Clone, Debug)]
pub struct WeakKernel {
    inner: Weak<KernelInner>,
}

impl WeakKernel {
    pub fn upgrade(&self) -> Option<Kernel> {
        self.inner.upgrade().map(|inner| Kernel { inner })
    }
}

impl Kernel {
    pub fn new() -> Self {
        Self::with_parameters(Parameters::default())
    }

    /// Create a kernel whose parameters are the defaults overridden by
    /// `parameters`.
    pub fn with_parameters(parameters: impl Into<Parameters>) -> Self {
        let kernel = Kernel {
            inner: Arc::new(KernelInner {
                phase: RwLock::new(KernelPhase::Dormant),
                bundles: RwLock::new(Vec::new()),
                parameters: parameters.into(),
                container: Container::new(),
            }),
        };
        kernel.bind_core_services();
        kernel
    }

    fn bind_core_services(&self) {
        let container = &self.inner.container;

        // Providers hand out fresh handles, so the container never stores
        // a handle to itself.
        container.provider::<Container, _>(|c| Ok(Arc::new(c.clone())));
        container.provider_named(&keys::CONTAINER_INSTANCE, |c| Ok(Arc::new(c.clone())));

        let weak = self.downgrade();
        container.provider::<Kernel, _>(move |_| upgrade(&weak));
        let weak = self.downgrade();
        container.provider_named(&keys::KERNEL, move |_| upgrade(&weak));

        container.set(EventManager::new());
        container.set(self.inner.parameters.clone());
        for (name, value) in self.inner.parameters.iter() {
            container.set_named(&Key::parameter(name), Arc::new(value.clone()));
        }
    }

    /// Register `bundle` with an empty supplied configuration.
    pub fn add_bundle<B: Bundle>(&self, bundle: B) -> Result<&Self> {
        self.register(BundleHost::new(bundle).into())
    }

    /// Register `bundle` with a supplied configuration, merged over the
    /// bundle's defaults during setup.
    pub fn add_bundle_with_config<B: Bundle>(&self, bundle: B, config: Value) -> Result<&Self> {
        self.register(BundleHost::with_config(bundle, config).into())
    }

    /// Register several bundles in order, stopping at the first failure.
    pub fn add_bundles<I>(&self, bundles: I) -> Result<&Self>
    where
        I: IntoIterator<Item = BundleRef>,
    {
        for bundle in bundles {
            self.register(bundle)?;
        }
        Ok(self)
    }

    fn register(&self, bundle: BundleRef) -> Result<&Self> {
        match self.phase() {
            KernelPhase::Dormant => {}
            KernelPhase::Initialised => {
                return Err(Error::KernelFrozen {
                    bundle: bundle.name().to_string(),
                })
            }
            phase => {
                return Err(Error::KernelLifecycleError {
                    phase,
                    bundle: Some(bundle.name().to_string()),
                    message: "bundles can only be added before init".to_string(),
                })
            }
        }

        let mut bundles = write(&self.inner.bundles);
        if bundles.iter().any(|existing| existing.id() == bundle.id()) {
            return Err(BundleSystemError::DuplicateBundle {
                bundle: bundle.name().to_string(),
            }
            .into());
        }
        bundle.bind_into(&self.inner.container);
        log::debug!("Registered bundle {}", bundle.name());
        bundles.push(bundle);
        Ok(self)
    }

    /// Bring every registered bundle up, in registration order.
    ///
    /// 1. setup: resolve and validate each config, check dependencies;
    /// 2. hook;
    /// 3. emit [`KernelBeforeInitEvent`];
    /// 4. prepare, between [`BundleBeforePrepareEvent`] and
    ///    [`BundleAfterPrepareEvent`];
    /// 5. init, between [`BundleBeforeInitEvent`] and
    ///    [`BundleAfterInitEvent`];
    /// 6. freeze and emit [`KernelAfterInitEvent`].
    ///
    /// The first error aborts the sequence and is returned unchanged. Nothing
    /// is rolled back: the kernel and its bundles stay in the phase they
    /// reached. Only a `Dormant` kernel can be initialised.
    pub async fn init(&self) -> Result<()> {
        {
            let mut phase = write(&self.inner.phase);
            if *phase != KernelPhase::Dormant {
                return Err(Error::lifecycle(
                    *phase,
                    "init can only run once, on a dormant kernel",
                ));
            }
            *phase = KernelPhase::BundleSetup;
        }
        let bundles = self.bundles();
        log::info!("Initializing {} v{} with {} bundle(s)", APP_NAME, APP_VERSION, bundles.len());

        for bundle in &bundles {
            bundle.slot().set_phase(BundlePhase::Setup)?;
            bundle
                .slot()
                .setup(self)
                .await
                .map_err(|err| failed(bundle, "setup", err))?;
        }

        self.enter(KernelPhase::Hooking);
        for bundle in &bundles {
            bundle.slot().set_phase(BundlePhase::Hooking)?;
            bundle
                .slot()
                .hook(self)
                .await
                .map_err(|err| failed(bundle, "hook", err))?;
            bundle.slot().set_phase(BundlePhase::Hooked)?;
        }

        let events = self.event_manager()?;
        self.enter(KernelPhase::Preparing);
        events.emit(KernelBeforeInitEvent).await?;

        for bundle in &bundles {
            bundle.slot().set_phase(BundlePhase::Preparing)?;
            events
                .emit(BundleBeforePrepareEvent {
                    bundle: bundle.clone(),
                })
                .await?;
            bundle
                .slot()
                .prepare(self)
                .await
                .map_err(|err| failed(bundle, "prepare", err))?;
            bundle.slot().set_phase(BundlePhase::Prepared)?;
            events
                .emit(BundleAfterPrepareEvent {
                    bundle: bundle.clone(),
                })
                .await?;
        }

        self.enter(KernelPhase::Initialising);
        for bundle in &bundles {
            bundle.slot().set_phase(BundlePhase::Initialising)?;
            events
                .emit(BundleBeforeInitEvent {
                    bundle: bundle.clone(),
                })
                .await?;
            bundle
                .slot()
                .init(self)
                .await
                .map_err(|err| failed(bundle, "init", err))?;
            bundle.slot().set_phase(BundlePhase::Initialised)?;
            events
                .emit(BundleAfterInitEvent {
                    bundle: bundle.clone(),
                })
                .await?;
        }

        self.enter(KernelPhase::Initialised);
        events.emit(KernelAfterInitEvent).await?;
        log::info!("Kernel initialised");
        Ok(())
    }

    fn enter(&self, next: KernelPhase) {
        let mut phase = write(&self.inner.phase);
        log::info!("Kernel phase: {} -> {}", *phase, next);
        *phase = next;
    }

    pub fn phase(&self) -> KernelPhase {
        *read(&self.inner.phase)
    }

    pub fn is_frozen(&self) -> bool {
        self.phase().is_frozen()
    }

    /// Registered bundles, in registration order.
    pub fn bundles(&self) -> Vec<BundleRef> {
        read(&self.inner.bundles).clone()
    }

    pub fn bundle_ids(&self) -> Vec<BundleId> {
        read(&self.inner.bundles).iter().map(BundleRef::id).collect()
    }

    pub fn has_bundle<B: Bundle>(&self) -> bool {
        self.has_bundle_id(&BundleId::of::<B>())
    }

    pub fn has_bundle_id(&self, id: &BundleId) -> bool {
        read(&self.inner.bundles).iter().any(|bundle| bundle.id() == *id)
    }

    /// Typed access to a registered bundle.
    pub fn bundle<B: Bundle>(&self) -> Option<Arc<BundleHost<B>>> {
        read(&self.inner.bundles)
            .iter()
            .find_map(|bundle| bundle.downcast::<B>())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.inner.parameters
    }

    pub fn container(&self) -> &Container {
        &self.inner.container
    }

    /// The event manager currently bound in the container.
    pub fn event_manager(&self) -> Result<Arc<EventManager>> {
        self.inner.container.get::<EventManager>()
    }

    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.inner.container.get::<T>()
    }

    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, key: &Key<T>) -> Result<Arc<T>> {
        self.inner.container.get_named(key)
    }

    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.inner.container.resolve::<T>()
    }

    pub fn downgrade(&self) -> WeakKernel {
        WeakKernel {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same kernel.
    pub fn ptr_eq(&self, other: &Kernel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("phase", &self.phase())
            .field("bundles", &self.bundle_ids())
            .field("parameters", &self.inner.parameters)
            .finish()
    }
}

fn upgrade(weak: &WeakKernel) -> Result<Arc<Kernel>> {
    weak.upgrade()
        .map(Arc::new)
        .ok_or_else(|| Error::Other("Kernel has been dropped".to_string()))
}

fn failed(bundle: &BundleRef, step: &str, err: Error) -> Error {
    log::error!("Bundle {} failed during {}: {}", bundle.name(), step, err);
    err
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
