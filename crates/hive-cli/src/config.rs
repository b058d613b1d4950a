//! Configuration management for the Hive CLI.

use anyhow::{Context, Result};
use hive::prelude::SwarmConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "hive.toml";

/// Hive project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub swarm: SwarmConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Defaults for `hive run` and `hive decide`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_flowers")]
    pub flowers: usize,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_flowers() -> usize { 3 }
fn default_ticks() -> u64 { 100 }
fn default_context() -> String { "all".to_string() }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            flowers: default_flowers(),
            ticks: default_ticks(),
            context: default_context(),
        }
    }
}

impl Config {
    /// Load config from hive.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .swarm
            .validate()
            .with_context(|| format!("Invalid swarm settings in {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find hive.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
