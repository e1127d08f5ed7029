//! Configuration management for Veil.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Engines receive the sections they need at construction time;
//! nothing reads configuration from global state.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Veil.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Kernel sizes per blur intensity
    pub blur: BlurConfig,

    /// Skin-tone band for face redaction
    pub skin_tone: SkinToneConfig,

    /// Re-encoding settings
    pub encode: EncodeConfig,

    /// Inline preview settings
    pub preview: PreviewConfig,

    /// Metadata removal settings
    pub metadata: MetadataConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/rs.veil.veil/config.toml
    /// - Linux: ~/.config/veil/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\veil\veil\config\config.toml
    ///
    /// Falls back to ~/.veil/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("rs", "veil", "veil")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".veil").join("config.toml")
            })
    }

    /// Resolved preview scratch directory (with ~ expansion), if configured.
    pub fn scratch_dir(&self) -> Option<PathBuf> {
        self.preview.scratch_dir.as_ref().map(|dir| {
            let path_str = dir.to_string_lossy();
            PathBuf::from(shellexpand::tilde(&path_str).into_owned())
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
