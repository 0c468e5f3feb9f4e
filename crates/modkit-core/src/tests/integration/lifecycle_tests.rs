#![cfg(test)]

use async_trait::async_trait;
use serde_json::Value;

use super::common::Trace;
use crate::bundle::{Bundle, BundleContext, BundleId, BundleSystemError};
use crate::event::{BundleBeforePrepareEvent, KernelAfterInitEvent};
use crate::kernel::error::{Error, Result};
use crate::kernel::{Kernel, KernelPhase};

struct Storage {
    trace: Trace,
}

#[async_trait]
impl Bundle for Storage {
    type Config = Value;

    async fn prepare(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("storage:prepare");
        Ok(())
    }

    async fn init(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("storage:init");
        Ok(())
    }
}

struct Api {
    trace: Trace,
}

#[async_trait]
impl Bundle for Api {
    type Config = Value;

    fn dependencies(&self) -> Vec<BundleId> {
        vec![BundleId::of::<Storage>()]
    }

    async fn hook(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        let trace = self.trace.clone();
        ctx.events()?.on(move |event: &BundleBeforePrepareEvent| {
            trace.push(format!("api:saw-prepare:{}", event.bundle.name()));
            Ok(())
        });
        let trace = self.trace.clone();
        ctx.events()?.on(move |_event: &KernelAfterInitEvent| {
            trace.push("api:kernel-ready");
            Ok(())
        });
        Ok(())
    }

    async fn prepare(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("api:prepare");
        Ok(())
    }

    async fn init(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("api:init");
        Ok(())
    }
}

#[tokio::test]
async fn test_dependent_bundles_start_in_registration_order() {
    let trace = Trace::new();
    let kernel = Kernel::new();
    kernel
        .add_bundle(Storage { trace: trace.clone() })
        .unwrap()
        .add_bundle(Api { trace: trace.clone() })
        .unwrap();

    kernel.init().await.unwrap();

    assert_eq!(
        trace.entries(),
        vec![
            "api:saw-prepare:Storage",
            "storage:prepare",
            "api:saw-prepare:Api",
            "api:prepare",
            "storage:init",
            "api:init",
            "api:kernel-ready",
        ]
    );
}

#[tokio::test]
async fn test_missing_dependency_stops_before_prepare() {
    let trace = Trace::new();
    let kernel = Kernel::new();
    kernel.add_bundle(Api { trace: trace.clone() }).unwrap();

    let err = kernel.init().await.unwrap_err();

    match err {
        Error::BundleSystem(BundleSystemError::DependencyMissing { bundle, dependency }) => {
            assert_eq!(bundle, "Api");
            assert_eq!(dependency, "Storage");
        }
        other => panic!("expected DependencyMissing, got {:?}", other),
    }
    assert!(trace.entries().is_empty());
    assert_eq!(kernel.phase(), KernelPhase::BundleSetup);
}

#[tokio::test]
async fn test_frozen_kernel_rejects_bundles() {
    let trace = Trace::new();
    let kernel = Kernel::new();
    kernel.add_bundle(Storage { trace: trace.clone() }).unwrap();
    kernel.init().await.unwrap();

    assert!(matches!(
        kernel.add_bundle(Api { trace: trace.clone() }),
        Err(Error::KernelFrozen { .. })
    ));
    assert!(kernel.add_bundle(Storage { trace }).is_err());
    assert_eq!(kernel.bundle_ids(), vec![BundleId::of::<Storage>()]);
}
