//! Error types for loading scene configuration.

use std::fmt;

/// Errors that can occur while loading a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    Io(std::io::Error),
    /// The file was not valid JSON for a scene config.
    Parse(serde_json::Error),
    /// The viewport cannot hold a scene.
    InvalidViewport { width: f32, height: f32, dpi: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read scene config: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse scene config: {}", e),
            ConfigError::InvalidViewport { width, height, dpi } => write!(
                f,
                "Invalid viewport {}x{} at dpi {}: sizes and dpi must be positive",
                width, height, dpi
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::InvalidViewport { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
