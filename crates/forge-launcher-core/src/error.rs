//! Error types for forge-launcher-core

use thiserror::Error;

/// Result type alias using forge-launcher-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error types
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value or format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown settings key
    #[error("Unknown setting: {key}")]
    UnknownSetting { key: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown setting error
    pub fn unknown_setting(key: impl Into<String>) -> Self {
        Self::UnknownSetting { key: key.into() }
    }
}
