use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Declarative pipeline configuration: one solver, ordered adapters.
///
/// Fixed at pipeline construction; reconfiguration means building a new
/// pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Solver capability identifier.
    #[serde(default = "default_solver")]
    pub solver: String,
    /// Adapter capability identifiers, outermost first.
    #[serde(default)]
    pub adapters: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            solver: default_solver(),
            adapters: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        if config.solver.trim().is_empty() {
            bail!("solver identifier must not be empty");
        }
        Ok(config)
    }
}

fn default_solver() -> String {
    "linear_interpolation".into()
}
