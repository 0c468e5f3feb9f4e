//! Kernel parameters: a flat JSON map merged over the defaults at kernel
//! construction and read-only afterwards.
//!
//! Every parameter is also bound in the container under `%name%`
//! (see [`Key::parameter`](crate::container::Key::parameter)).
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kernel::constants::{CONTEXT_PARAMETER, DEBUG_PARAMETER, DEFAULT_CONTEXT};
use crate::kernel::error::{Error, Result};

/// Where the application runs. Carried by the `context` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    Server,
    Cli,
    Worker,
    Test,
}

impl ExecutionContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionContext::Server => "server",
            ExecutionContext::Cli => "cli",
            ExecutionContext::Worker => "worker",
            ExecutionContext::Test => "test",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "server" => Ok(ExecutionContext::Server),
            "cli" => Ok(ExecutionContext::Cli),
            "worker" => Ok(ExecutionContext::Worker),
            "test" => Ok(ExecutionContext::Test),
            other => Err(Error::Other(format!("Unknown execution context '{}'", other))),
        }
    }
}

/// File formats accepted by [`Parameters::from_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterFormat {
    Json,
    #[cfg(feature = "yaml-config")]
    Yaml,
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ParameterFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(ParameterFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ParameterFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ParameterFormat::Toml),
            _ => None,
        }
    }

    fn parse(&self, data: &str, path: &Path) -> Result<Value> {
        match self {
            ParameterFormat::Json => serde_json::from_str(data)
                .map_err(|e| Error::parameter_load(path, "invalid JSON", Some(Box::new(e)))),
            #[cfg(feature = "yaml-config")]
            ParameterFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| Error::parameter_load(path, "invalid YAML", Some(Box::new(e)))),
            #[cfg(feature = "toml-config")]
            ParameterFormat::Toml => toml::from_str(data)
                .map_err(|e| Error::parameter_load(path, "invalid TOML", Some(Box::new(e)))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    values: Map<String, Value>,
}

impl Parameters {
    /// `debug = false`, `context = "server"`.
    pub fn defaults() -> Map<String, Value> {
        let mut values = Map::new();
        values.insert(DEBUG_PARAMETER.to_string(), Value::Bool(false));
        values.insert(
            CONTEXT_PARAMETER.to_string(),
            Value::String(DEFAULT_CONTEXT.to_string()),
        );
        values
    }

    /// Defaults with `overrides` applied on top, key by key.
    pub fn new(overrides: Map<String, Value>) -> Self {
        let mut values = Self::defaults();
        values.extend(overrides);
        Self { values }
    }

    /// Apply further overrides, e.g. command-line values over a file.
    pub fn merged(mut self, overrides: Map<String, Value>) -> Self {
        self.values.extend(overrides);
        self
    }

    /// Load overrides from a JSON, TOML or YAML file (by extension). The
    /// document must be a table at the top level.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ParameterFormat::from_path(path)
            .ok_or_else(|| Error::parameter_load(path, "unsupported file format", None))?;
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::parameter_load(path, "could not read file", Some(Box::new(e))))?;
        match format.parse(&data, path)? {
            Value::Object(overrides) => {
                log::debug!("Loaded {} parameter(s) from {}", overrides.len(), path.display());
                Ok(Self::new(overrides))
            }
            _ => Err(Error::parameter_load(path, "top level must be a table", None)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn debug(&self) -> bool {
        self.get(DEBUG_PARAMETER).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The `context` parameter, if it names a known context.
    pub fn context(&self) -> Option<ExecutionContext> {
        self.get(CONTEXT_PARAMETER)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(overrides: Map<String, Value>) -> Self {
        Self::new(overrides)
    }
}
