#![cfg(test)]

use async_trait::async_trait;
use serde_json::{json, Value};

use super::common::Trace;
use crate::bundle::{Bundle, BundleContext};
use crate::event::{BundleAfterPrepareEvent, Handler, ListenerOptions};
use crate::kernel::error::Result;
use crate::kernel::Kernel;

/// Subscribes in `prepare` to the moment `Payments` finishes preparing.
struct Audit {
    trace: Trace,
}

#[async_trait]
impl Bundle for Audit {
    type Config = Value;

    async fn prepare(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("audit:prepare");
        let trace = self.trace.clone();
        ctx.events()?.add_listener(
            Handler::sync(move |event: &BundleAfterPrepareEvent| {
                trace.push(format!("audit:observed:{}", event.bundle.name()));
                // Siblings can be adjusted from here.
                event.bundle.update_config(json!({ "audited": true }))
            }),
            ListenerOptions::default().filter(|event: &BundleAfterPrepareEvent| event.bundle.is::<Payments>()),
        );
        Ok(())
    }

    async fn init(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("audit:init");
        Ok(())
    }
}

struct Inventory {
    trace: Trace,
}

#[async_trait]
impl Bundle for Inventory {
    type Config = Value;

    async fn prepare(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("inventory:prepare");
        Ok(())
    }

    async fn init(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("inventory:init");
        Ok(())
    }
}

struct Payments {
    trace: Trace,
}

#[async_trait]
impl Bundle for Payments {
    type Config = Value;

    async fn prepare(&self, _ctx: &BundleContext<'_, Self>) -> Result<()> {
        self.trace.push("payments:prepare");
        Ok(())
    }

    async fn init(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        let audited = ctx.config()?.get("audited").cloned();
        self.trace.push(format!("payments:init:audited={}", audited.unwrap_or(Value::Null)));
        Ok(())
    }
}

#[tokio::test]
async fn test_observer_fires_once_after_target_prepare() {
    let trace = Trace::new();
    let kernel = Kernel::new();
    kernel
        .add_bundle(Audit { trace: trace.clone() })
        .unwrap()
        .add_bundle(Inventory { trace: trace.clone() })
        .unwrap()
        .add_bundle(Payments { trace: trace.clone() })
        .unwrap();

    kernel.init().await.unwrap();

    assert_eq!(trace.count("audit:observed:Payments"), 1);
    assert_eq!(trace.count("audit:observed:Inventory"), 0);

    let observed = trace.position("audit:observed:Payments").unwrap();
    assert!(trace.position("payments:prepare").unwrap() < observed);
    for init in ["audit:init", "inventory:init", "payments:init:audited=true"] {
        assert!(observed < trace.position(init).unwrap(), "{} ran before the observer", init);
    }
}
