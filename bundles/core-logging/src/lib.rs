//! Installs the process-wide logger while the kernel hooks its bundles.
//!
//! Records from the `log` facade (used by `modkit-core`) are bridged into
//! `tracing` and written to stderr by a `tracing-subscriber` fmt layer.
//! `RUST_LOG` takes precedence over the configured level.
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use modkit_core::bundle::{Bundle, BundleContext, BundlePhase, BundleSystemError};
use modkit_core::event::{Event, Handler, ListenerOptions};
use modkit_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive. Unset means `debug` when the kernel's `debug`
    /// parameter is true, `info` otherwise.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
    /// Log every emitted event at debug level.
    #[serde(default)]
    pub trace_events: bool,
}

#[derive(Debug, Default)]
pub struct LoggingBundle {
    installed: AtomicBool,
}

impl LoggingBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this bundle's subscriber became the global default.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bundle for LoggingBundle {
    type Config = LoggingConfig;

    fn name(&self) -> &'static str {
        "core-logging"
    }

    fn default_config(&self) -> Value {
        json!({ "format": "pretty", "trace_events": true })
    }

    // The subscriber is built from the config during hook.
    fn config_locked_from(&self) -> Option<BundlePhase> {
        Some(BundlePhase::Hooked)
    }

    async fn validate(&self, config: &LoggingConfig) -> Result<()> {
        if let Some(level) = &config.level {
            EnvFilter::try_new(level).map_err(|e| {
                BundleSystemError::invalid_config(self.name(), format!("invalid level '{}': {}", level, e))
            })?;
        }
        Ok(())
    }

    async fn hook(&self, ctx: &BundleContext<'_, Self>) -> Result<()> {
        let config = ctx.config()?;
        let debug = ctx.parameter("debug").and_then(Value::as_bool).unwrap_or(false);
        let level = effective_level(&config, debug);

        let installed = install(&level, config.format);
        self.installed.store(installed, Ordering::SeqCst);

        if config.trace_events {
            ctx.events()?.add_global_listener(
                Handler::<dyn Event>::sync(|event| {
                    tracing::debug!(event = event.name(), "event emitted");
                    Ok(())
                }),
                ListenerOptions::ordered(i32::MIN),
            );
        }

        log::info!("Logging ready (level '{}', format {:?})", level, config.format);
        Ok(())
    }
}

/// The filter directive used when `RUST_LOG` is unset.
pub fn effective_level(config: &LoggingConfig, debug: bool) -> String {
    match &config.level {
        Some(level) => level.clone(),
        None if debug => "debug".to_string(),
        None => "info".to_string(),
    }
}

fn install(level: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let bridged = tracing_log::LogTracer::init().is_ok();

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().pretty().with_writer(std::io::stderr)),
        ),
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    match result {
        Ok(()) => {
            if !bridged {
                tracing::warn!("A `log` logger was already set; log records are not bridged");
            }
            true
        }
        Err(err) => {
            log::warn!("Logger already installed, keeping it: {}", err);
            false
        }
    }
}
