//! Per-concern settings sections
//!
//! Each section is a plain serde struct with defaults, so a partial TOML file
//! only overrides the keys it names.

use serde::{Deserialize, Serialize};

/// Default session file extension (without the dot)
pub const DEFAULT_SESSION_EXTENSION: &str = "irec";

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// When the recorder writes pointer coordinates to its outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardPolicy {
    /// Every step the pointer is present
    #[default]
    Always,
    /// Only on steps where the position differs from the last one forwarded
    OnChange,
}

impl std::fmt::Display for ForwardPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForwardPolicy::Always => write!(f, "always"),
            ForwardPolicy::OnChange => write!(f, "on change"),
        }
    }
}

/// Recorder node settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub forward_policy: ForwardPolicy,
}

/// Session capture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Recording stops after this many frames (0 = unlimited)
    pub max_frames: usize,
    /// Extension used for session files
    pub file_extension: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frames: 0,
            file_extension: DEFAULT_SESSION_EXTENSION.to_string(),
        }
    }
}

impl SessionConfig {
    /// Whether `frames` has reached the configured limit
    pub fn limit_reached(&self, frames: usize) -> bool {
        self.max_frames > 0 && frames >= self.max_frames
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
