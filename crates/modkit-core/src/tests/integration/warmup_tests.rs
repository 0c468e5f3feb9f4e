#![cfg(test)]

use async_trait::async_trait;
use serde_json::Value;

use super::common::Trace;
use crate::bundle::{Bundle, BundleContext, Initializable, WarmupTarget};
use crate::container::{Container, Injectable};
use crate::kernel::error::{Error, Result};
use crate::kernel::{Kernel, KernelPhase};

struct SearchIndex {
    trace: Trace,
}

impl Injectable for SearchIndex {
    fn inject(container: &Container) -> Result<Self> {
        Ok(SearchIndex {
            trace: (*container.get::<Trace>()?).clone(),
        })
    }
}

#[async_trait]
impl Initializable for SearchIndex {
    async fn init(&self) -> Result<()> {
        self.trace.push("index:init");
        Err(Error::Other("index unavailable".to_string()))
    }
}

struct Search {
    trace: Trace,
}

#[async_trait]
impl Bundle for Search {
    type Config = Value;

    async fn init(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("search:init");
        ctx.warmup(&[WarmupTarget::initializable::<SearchIndex>()]).await
    }
}

struct Reporting {
    trace: Trace,
}

#[async_trait]
impl Bundle for Reporting {
    type Config = Value;

    async fn init(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("reporting:init");
        Ok(())
    }
}

#[tokio::test]
async fn test_warmup_failure_aborts_init() {
    let trace = Trace::new();
    let kernel = Kernel::new();
    kernel.container().set(trace.clone());
    kernel
        .add_bundle(Search { trace: trace.clone() })
        .unwrap()
        .add_bundle(Reporting { trace: trace.clone() })
        .unwrap();

    let err = kernel.init().await.unwrap_err();

    assert!(matches!(err, Error::Other(ref message) if message == "index unavailable"));
    assert_eq!(trace.entries(), vec!["search:init", "index:init"]);
    assert_eq!(kernel.phase(), KernelPhase::Initialising);
}
