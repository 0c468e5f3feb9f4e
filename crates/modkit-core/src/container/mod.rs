//! # Modkit Core Container
//!
//! A small service container shared by the kernel, its bundles and the
//! services they resolve.
//!
//! Bindings are stored as `Arc<T>` behind a type-erased box and are addressed
//! by a [`ServiceId`]: either the bound type itself (which may be a
//! `dyn Trait`, allowing a capability to be rebound to another
//! implementation) or a typed [`Key`]. Three binding flavours exist:
//!
//! - instances, bound eagerly with [`Container::set`] / [`Container::bind`];
//! - lazy singletons, built by a factory on first lookup and cached;
//! - providers, whose factory runs on every lookup.
//!
//! [`Container::resolve`] constructs [`Injectable`] services on demand and
//! caches them, giving singleton semantics without an explicit binding.
pub mod error;
pub mod key;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::kernel::error::Result;

pub use error::ContainerError;
pub use key::{Key, ServiceId};

/// Well-known keys bound by the kernel at construction.
pub mod keys {
    use super::{Container, Key};
    use crate::kernel::Kernel;

    /// The container itself.
    pub const CONTAINER_INSTANCE: Key<Container> = Key::new("ContainerInstance");
    /// The kernel owning the container.
    pub const KERNEL: Key<Kernel> = Key::new("Kernel");
}

/// Services that know how to build themselves from the container.
pub trait Injectable: Sized + Send + Sync + 'static {
    fn inject(container: &Container) -> Result<Self>;
}

// Always holds an `Arc<T>` for the `T` the binding was registered with.
type Erased = Box<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> Result<Erased> + Send + Sync>;

enum Binding {
    Instance(Erased),
    Singleton(Factory),
    Provider(Factory),
}

/// Shared service container. Clones share the same bindings.
#[derive(Clone, Default)]
pub struct Container {
    bindings: Arc<RwLock<HashMap<ServiceId, Binding>>>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.read().len())
            .finish()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under its own type.
    pub fn set<T: Send + Sync + 'static>(&self, value: T) {
        self.bind(Arc::new(value));
    }

    /// Bind a shared value under `T`, which may be unsized (`dyn Trait`).
    /// Replaces whatever was bound under `T` before.
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) {
        self.insert(ServiceId::of::<T>(), Binding::Instance(Box::new(value)));
    }

    /// Bind a shared value under a named key.
    pub fn set_named<T: ?Sized + Send + Sync + 'static>(&self, key: &Key<T>, value: Arc<T>) {
        self.insert(key.service_id(), Binding::Instance(Box::new(value)));
    }

    /// Register a factory for `T` that runs once, on first lookup.
    pub fn singleton<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(ServiceId::of::<T>(), Binding::Singleton(erase(factory)));
    }

    /// Register a factory for `T` that runs on every lookup.
    pub fn provider<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(ServiceId::of::<T>(), Binding::Provider(erase(factory)));
    }

    /// Register a per-lookup factory under a named key.
    pub fn provider_named<T, F>(&self, key: &Key<T>, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(key.service_id(), Binding::Provider(erase(factory)));
    }

    /// Look up the service bound under `T`.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.lookup::<T>(ServiceId::of::<T>())
    }

    /// Look up the service bound under `key`.
    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, key: &Key<T>) -> Result<Arc<T>> {
        self.lookup::<T>(key.service_id())
    }

    /// Return the bound `T`, or build it with [`Injectable::inject`] and
    /// cache it for subsequent lookups.
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        let id = ServiceId::of::<T>();
        if self.read().contains_key(&id) {
            return self.lookup::<T>(id);
        }

        log::debug!("Constructing service {}", id);
        let instance = Arc::new(T::inject(self)?);

        let mut bindings = self.write();
        // `inject` may itself have bound `T`; the first instance wins.
        if let Some(Binding::Instance(existing)) = bindings.get(&id) {
            return downcast::<T>(existing, &id);
        }
        bindings.insert(id, Binding::Instance(Box::new(instance.clone())));
        Ok(instance)
    }

    pub fn has<T: ?Sized + 'static>(&self) -> bool {
        self.read().contains_key(&ServiceId::of::<T>())
    }

    pub fn has_named<T: ?Sized>(&self, key: &Key<T>) -> bool {
        self.read().contains_key(&key.service_id())
    }

    /// Identifiers of every binding, in no particular order.
    pub fn service_ids(&self) -> Vec<ServiceId> {
        self.read().keys().cloned().collect()
    }

    fn lookup<T: ?Sized + Send + Sync + 'static>(&self, id: ServiceId) -> Result<Arc<T>> {
        // The lock is released before any factory runs so factories can
        // resolve their own dependencies.
        let (factory, cache) = {
            let bindings = self.read();
            match bindings.get(&id) {
                None => {
                    return Err(ContainerError::ServiceNotFound {
                        service: id.to_string(),
                    }
                    .into())
                }
                Some(Binding::Instance(erased)) => return downcast::<T>(erased, &id),
                Some(Binding::Singleton(factory)) => (factory.clone(), true),
                Some(Binding::Provider(factory)) => (factory.clone(), false),
            }
        };

        let produced = factory(self)?;
        let value = downcast::<T>(&produced, &id)?;
        if cache {
            let mut bindings = self.write();
            if let Some(Binding::Instance(existing)) = bindings.get(&id) {
                return downcast::<T>(existing, &id);
            }
            bindings.insert(id, Binding::Instance(produced));
        }
        Ok(value)
    }

    fn insert(&self, id: ServiceId, binding: Binding) {
        log::debug!("Binding service {}", id);
        self.write().insert(id, binding);
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ServiceId, Binding>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ServiceId, Binding>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn erase<T, F>(factory: F) -> Factory
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| factory(container).map(|value| Box::new(value) as Erased))
}

fn downcast<T: ?Sized + Send + Sync + 'static>(erased: &Erased, id: &ServiceId) -> Result<Arc<T>> {
    erased
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| {
            ContainerError::TypeMismatch {
                service: id.to_string(),
                expected: std::any::type_name::<T>(),
            }
            .into()
        })
}
