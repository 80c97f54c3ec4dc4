//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use muster_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, stored as `muster.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding downloaded documents and their page dumps
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving `faq.json` and `battleprofile.json`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory of hand-authored overlay documents
    #[serde(default = "default_overlay_dir")]
    pub overlay_dir: PathBuf,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Extraction tolerances
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Could not find configuration directory".into()))?;
        Ok(dir.join("muster").join("muster.toml"))
    }

    /// Load configuration from the default location, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CliError::Config("output_dir must not be empty".into()));
        }
        self.extractor.validate().map_err(CliError::Config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            overlay_dir: default_overlay_dir(),
            color: true,
            extractor: ExtractorConfig::default(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_overlay_dir() -> PathBuf {
    PathBuf::from("overlays")
}

fn default_true() -> bool {
    true
}
