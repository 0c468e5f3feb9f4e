//! A small bundle that greets and echoes kernel events to stdout.
use modkit_core::bundle::{Bundle, BundleContext};
use modkit_core::event::{Event, Handler, ListenerOptions};
use async_trait::async_trait;
use modkit_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreeterConfig {
    pub greeting: String,
}

#[derive(Debug, Default)]
pub struct Greeter;

#[async_trait]
impl Bundle for Greeter {
    type Config = GreeterConfig;

    fn name(&self) -> &'static str {
        "greeter"
    }

    fn default_config(&self) -> Value {
        json!({ "greeting": "Hello" })
    }

    async fn hook(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        ctx.events()?.add_global_listener(
            Handler::<dyn Event>::sync(|event| {
                println!("[event] {}", event.name());
                Ok(())
            }),
            ListenerOptions::default(),
        );
        Ok(())
    }

    async fn init(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        let config = ctx.config()?;
        let name = ctx.parameter("name").and_then(Value::as_str).unwrap_or("world");
        println!("{}, {}!", config.greeting, name);
        Ok(())
    }
}
