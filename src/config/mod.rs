//! Generator configuration (TOML or YAML).
//!
//! ```toml
//! [output]
//! format = "json"
//! pretty = true
//! include_positions = true
//!
//! [parallel]
//! threads = 0
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Rendering of a canonical tree or registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(anyhow::anyhow!("Unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Emit start/length for every node
    #[serde(default = "default_true")]
    pub include_positions: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: OutputFormat::Json, pretty: true, include_positions: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Worker threads for batch conversion; 0 = rayon's default
    #[serde(default)]
    pub threads: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeGenConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub parallel: ParallelConfig,
}

fn default_true() -> bool {
    true
}

/// Thread counts above this are almost certainly a typo.
const MAX_THREADS: usize = 1024;

impl TreeGenConfig {
    /// Load from `.toml`, `.yaml` or `.yml`, picked by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml").to_lowercase();
        let config: Self = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config from {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config from {}", path.display()))?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Pretty TOML, the format `save_to_file` writes.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Always TOML, whatever the extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Rejects thread counts above the pool limit.
    pub fn validate(&self) -> Result<()> {
        if self.parallel.threads > MAX_THREADS {
            bail!("parallel.threads = {} exceeds the limit of {}", self.parallel.threads, MAX_THREADS);
        }
        Ok(())
    }
}
