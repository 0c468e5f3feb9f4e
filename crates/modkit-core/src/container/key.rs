use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::utils::short_type_name;

/// Identifier a binding is stored under.
///
/// Type identifiers compare by [`TypeId`] only; the captured name is kept for
/// diagnostics.
#[derive(Clone)]
pub enum ServiceId {
    /// Keyed by the bound type itself (concrete type or `dyn Trait`).
    Type { id: TypeId, name: &'static str },
    /// Keyed by a string token, see [`Key`].
    Named(Cow<'static, str>),
}

impl ServiceId {
    /// Identifier for the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        ServiceId::Type {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }

    /// Identifier for a named key.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        ServiceId::Named(name.into())
    }
}

impl PartialEq for ServiceId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ServiceId::Type { id: a, .. }, ServiceId::Type { id: b, .. }) => a == b,
            (ServiceId::Named(a), ServiceId::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ServiceId {}

impl Hash for ServiceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ServiceId::Type { id, .. } => {
                0u8.hash(state);
                id.hash(state);
            }
            ServiceId::Named(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Type { name, .. } => write!(f, "Type({})", name),
            ServiceId::Named(name) => write!(f, "Named({})", name),
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Type { name, .. } => f.write_str(name),
            ServiceId::Named(name) => f.write_str(name),
        }
    }
}

/// A named container token that remembers the type of value bound under it.
///
/// Two keys with the same name address the same binding; the type parameter
/// only drives the downcast on lookup.
pub struct Key<T: ?Sized> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Key<T> {
    /// Creates a key with a static name. Usable in `const` position.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _marker: PhantomData,
        }
    }

    /// Creates a key with a runtime-computed name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_id(&self) -> ServiceId {
        ServiceId::Named(self.name.clone())
    }
}

impl Key<serde_json::Value> {
    /// Key under which the kernel exposes the parameter `name`, i.e. `%name%`.
    pub fn parameter(name: &str) -> Self {
        Self::named(format!("%{}%", name))
    }
}

impl<T: ?Sized> Clone for Key<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}
