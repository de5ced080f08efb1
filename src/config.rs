//! Rendering configuration for the built-in line sinks.
//!
//! Only controls how `StdoutSink` and `WriterSink` format records. Choosing
//! which sink is active is left to the embedding program.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub format: OutputFormat,
    /// Prefix each record with an RFC 3339 UTC timestamp.
    pub timestamps: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            timestamps: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read sink config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sink config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SinkConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Reads a `SinkConfig` from a JSON file. Missing fields take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<SinkConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    SinkConfig::from_json(&content)
}
