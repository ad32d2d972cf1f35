//! Configuration loading from sweep.toml
//!
//! Harness configuration can be specified in a `sweep.toml` file, discovered
//! by walking up from the current directory. CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    /// External collaborator commands
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Sweep execution options
    #[serde(default)]
    pub run: RunConfig,
    /// Output options
    #[serde(default)]
    pub output: OutputConfig,
}

/// The external commands the harness drives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Measurement wrapper executable
    #[serde(default = "default_wrapper")]
    pub wrapper: String,
    /// Hash-table program under test
    #[serde(default = "default_program")]
    pub program: String,
    /// Flag the wrapper forwards the load factor under
    #[serde(default = "default_load_flag")]
    pub load_flag: String,
    /// Sampler command, or "builtin" for in-process dataset generation
    #[serde(default = "default_sampler")]
    pub sampler: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            wrapper: default_wrapper(),
            program: default_program(),
            load_flag: default_load_flag(),
            sampler: default_sampler(),
        }
    }
}

fn default_wrapper() -> String {
    "./measure".to_string()
}
fn default_program() -> String {
    "./freq".to_string()
}
fn default_load_flag() -> String {
    "-l".to_string()
}
fn default_sampler() -> String {
    "shuf".to_string()
}

/// Sweep execution options
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Number of parallel pipeline invocations
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Abort the sweep on the first failed invocation
    #[serde(default)]
    pub fail_fast: bool,
    /// Truncate the sweep to item counts at or below this value
    #[serde(default)]
    pub max_items: Option<u64>,
}

/// Output options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output file path (stdout if not set)
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl SweepConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("sweep.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}
