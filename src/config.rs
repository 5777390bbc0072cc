use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level kgate configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KgateConfig {
    /// Channel model settings.
    #[serde(default)]
    pub model: ModelToml,

    /// Rate evaluation settings.
    #[serde(default)]
    pub rates: RatesToml,

    /// Coarse-graining settings.
    #[serde(default)]
    pub lump: LumpToml,

    /// Trajectory sampling settings.
    #[serde(default)]
    pub simulate: SimulateToml,
}

impl KgateConfig {
    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

/// Either `voltage` or both `alpha` and `beta` select the rates.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default = "default_lag")]
    pub lag: f64,
    #[serde(default)]
    pub singlet: bool,
}

impl Default for ModelToml {
    fn default() -> Self {
        Self {
            voltage: None,
            alpha: None,
            beta: None,
            lag: default_lag(),
            singlet: false,
        }
    }
}

fn default_lag() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatesToml {
    #[serde(default = "default_guard_band")]
    pub guard_band: f64,
    #[serde(default = "default_policy")]
    pub policy: String,
}

impl Default for RatesToml {
    fn default() -> Self {
        Self {
            guard_band: default_guard_band(),
            policy: default_policy(),
        }
    }
}

fn default_guard_band() -> f64 {
    1e-6
}
fn default_policy() -> String {
    "limit".to_string()
}

/// Cluster assignment; defaults to closed states vs. the open state.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LumpToml {
    #[serde(default)]
    pub assignment: Option<Vec<usize>>,
    #[serde(default)]
    pub n_clusters: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulateToml {
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    #[serde(default)]
    pub initial: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulateToml {
    fn default() -> Self {
        Self {
            n_steps: default_n_steps(),
            initial: None,
            seed: None,
        }
    }
}

fn default_n_steps() -> usize {
    1000
}
