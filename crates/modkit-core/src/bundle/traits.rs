use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::bundle::context::BundleContext;
use crate::bundle::phase::BundlePhase;
use crate::kernel::error::Result;
use crate::utils::short_type_name;

/// Identifies a bundle by its concrete type.
#[derive(Clone, Copy)]
pub struct BundleId {
    type_id: TypeId,
    name: &'static str,
}

impl BundleId {
    pub fn of<B: Bundle>() -> Self {
        Self {
            type_id: TypeId::of::<B>(),
            name: short_type_name::<B>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for BundleId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for BundleId {}

impl Hash for BundleId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BundleId({})", self.name)
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A configurable unit of application logic.
///
/// The kernel drives every registered bundle through `setup` (config merge,
/// [`validate`](Bundle::validate), dependency check), then
/// [`hook`](Bundle::hook), [`prepare`](Bundle::prepare) and
/// [`init`](Bundle::init), one bundle at a time in registration order. All
/// hooks default to no-ops.
///
/// The final configuration is `{}` deep-merged with
/// [`default_config`](Bundle::default_config) and then with the config
/// supplied at registration, deserialized into [`Bundle::Config`].
#[async_trait]
pub trait Bundle: Sized + Send + Sync + 'static {
    type Config: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;

    /// Name used in logs and error messages.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Partial configuration applied under the supplied config.
    fn default_config(&self) -> Value {
        Value::Object(Map::new())
    }

    /// Bundles that must be registered on the same kernel. Only presence is
    /// checked; registration order is not changed.
    fn dependencies(&self) -> Vec<BundleId> {
        Vec::new()
    }

    /// Phase from which [`update_config`](crate::bundle::BundleHost::update_config)
    /// and [`set_config`](crate::bundle::BundleHost::set_config) are rejected.
    /// `None` keeps the configuration mutable for the whole lifetime.
    fn config_locked_from(&self) -> Option<BundlePhase> {
        None
    }

    async fn validate(&self, _config: &Self::Config) -> Result<()> {
        Ok(())
    }

    /// Runs once every bundle is set up. The place to subscribe to
    /// lifecycle events or adjust sibling bundles.
    async fn hook(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        Ok(())
    }

    async fn prepare(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        Ok(())
    }

    async fn init(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        Ok(())
    }
}
