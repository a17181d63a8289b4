// Configuration management for segclust

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the alignment database
    pub db_path: PathBuf,

    /// Directory where clustering results are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Percentile used as threshold when none is given explicitly (1-99)
    #[serde(default = "default_percentile")]
    pub percentile: u8,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_percentile() -> u8 {
    crate::clustering::DEFAULT_PERCENTILE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("folkroot.db"),
            output_dir: default_output_dir(),
            percentile: default_percentile(),
        }
    }
}

impl Config {
    /// Load config from disk or return default
    pub fn load_or_default(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read config file: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Save config to disk
    pub fn save(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;
        Ok(())
    }
}
