#![cfg(test)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::bundle::{Bundle, BundleContext};
use crate::kernel::error::Result;
use crate::kernel::Kernel;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MailerConfig {
    sender: String,
    #[serde(default)]
    retries: u32,
    transport: TransportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransportConfig {
    host: String,
    port: u16,
}

struct Mailer;

impl Bundle for Mailer {
    type Config = MailerConfig;

    fn default_config(&self) -> Value {
        json!({
            "sender": "noreply@localhost",
            "transport": { "host": "localhost", "port": 25 }
        })
    }
}

/// Tunes its sibling's configuration while hooking.
struct Tuning;

#[async_trait]
impl Bundle for Tuning {
    type Config = Value;

    async fn hook(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        if let Some(mailer) = ctx.kernel().bundle::<Mailer>() {
            mailer.update_config(json!({ "retries": 3 }))?;
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_nested_defaults_merge_with_supplied_and_sibling_updates() {
    let kernel = Kernel::new();
    kernel
        .add_bundle_with_config(Mailer, json!({ "transport": { "port": 2525 } }))
        .unwrap()
        .add_bundle(Tuning)
        .unwrap();

    kernel.init().await.unwrap();

    let config = kernel.bundle::<Mailer>().unwrap().config().unwrap();
    assert_eq!(config.sender, "noreply@localhost");
    assert_eq!(config.transport.host, "localhost");
    assert_eq!(config.transport.port, 2525);
    assert_eq!(config.retries, 3);
}

#[tokio::test]
async fn test_parameters_reach_bundles() {
    struct Probe;

    #[async_trait]
    impl Bundle for Probe {
        type Config = Value;

        async fn init(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
            let debug = ctx.parameter("debug").and_then(Value::as_bool).unwrap_or(false);
            ctx.container().set(format!("debug={}", debug));
            Ok(())
        }
    }

    let mut overrides = serde_json::Map::new();
    overrides.insert("debug".to_string(), json!(true));
    let kernel = Kernel::with_parameters(overrides);
    kernel.add_bundle(Probe).unwrap();
    kernel.init().await.unwrap();

    assert_eq!(*kernel.get::<String>().unwrap(), "debug=true");
}
