//! Configuration handling for the seedix CLI
//!
//! Supports loading configuration from seedix.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use seedix_core::IndexConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print machine-readable JSON instead of text
    #[serde(default)]
    pub json: bool,

    /// Sequence pairs reported by `shared`
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize { 20 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            top: default_top(),
        }
    }
}

/// Flags that override file values when given
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threads: Option<usize>,
    pub shape: Option<String>,
    pub partition_bits: Option<u32>,
    pub seq_chunks: Option<usize>,
    pub index_chunks: Option<usize>,
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("seedix.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: seedix.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Apply command-line overrides and validate the result
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        let index = &mut self.index;
        if let Some(threads) = overrides.threads {
            index.threads = threads;
        }
        if let Some(shape) = overrides.shape {
            index.shape = shape;
        }
        if let Some(bits) = overrides.partition_bits {
            index.partition_bits = bits;
        }
        if let Some(chunks) = overrides.seq_chunks {
            index.seq_chunks = chunks;
        }
        if let Some(chunks) = overrides.index_chunks {
            index.index_chunks = chunks;
        }
        index.validate().context("Invalid index configuration")?;
        Ok(self)
    }
}
