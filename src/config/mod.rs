//! Configuration module for inputrec-rs
//!
//! Settings are read from a TOML file. Every section and key is optional; a
//! missing file yields the defaults.
//!
//! # Config Location
//!
//! - **Linux**: `~/.config/dev.inputrec.inputrec-rs/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.inputrec.inputrec-rs/config.toml`
//! - **Windows**: `%APPDATA%\dev.inputrec.inputrec-rs\config.toml`
//!
//! # Example
//!
//! ```toml
//! [recorder]
//! forward_policy = "on_change"
//!
//! [session]
//! max_frames = 36000
//!
//! [logging]
//! filter = "inputrec_rs=debug"
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{RecorderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_ID: &str = "dev.inputrec.inputrec-rs";

pub const CONFIG_FILE: &str = "config.toml";

/// Platform config directory for this crate
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recorder: RecorderConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| RecorderError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Render as a TOML document
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RecorderError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            RecorderError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Load from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save to `path`, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RecorderError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| {
            RecorderError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}
