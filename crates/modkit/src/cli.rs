use std::path::PathBuf;

use clap::Parser;
use modkit_core::ExecutionContext;
use serde_json::{json, Map, Value};

/// Modkit: boot an application from bundles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Set the `debug` parameter
    #[arg(long)]
    pub debug: bool,

    /// Execution context (server, cli, worker, test)
    #[arg(long, value_parser = parse_context)]
    pub context: Option<ExecutionContext>,

    /// Kernel parameter as KEY=VALUE; VALUE is read as JSON, else as a string
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// JSON, TOML or YAML file with kernel parameters
    #[arg(long, value_name = "PATH")]
    pub params_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_parser = ["pretty", "compact", "json"])]
    pub log_format: Option<String>,
}

impl CliArgs {
    /// Parameters given on the command line. They win over the params file.
    pub fn overrides(&self) -> Map<String, Value> {
        let mut overrides: Map<String, Value> = self.params.iter().cloned().collect();
        if self.debug {
            overrides.insert("debug".to_string(), Value::Bool(true));
        }
        if let Some(context) = self.context {
            overrides.insert("context".to_string(), Value::String(context.to_string()));
        }
        overrides
    }

    /// Supplied configuration for the logging bundle.
    pub fn logging_config(&self) -> Value {
        match &self.log_format {
            Some(format) => json!({ "format": format }),
            None => json!({}),
        }
    }
}

fn parse_context(s: &str) -> Result<ExecutionContext, String> {
    s.parse().map_err(|e: modkit_core::Error| e.to_string())
}

pub fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
