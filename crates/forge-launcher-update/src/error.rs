//! Error types for forge-launcher-update

use std::path::Path;
use thiserror::Error;

/// Result type alias using forge-launcher-update's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the update workflow
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch failed, returned a non-success status, or timed out
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Remote listing or release page format not recognized
    #[error("Unrecognized listing format: {message}")]
    Parse { message: String },

    /// Archive unreadable, write failure, or unsafe entry path
    #[error("Failed to extract {archive}: {message}")]
    Extraction { archive: String, message: String },

    /// Executable missing from the install folder
    #[error("Executable not found: {path}")]
    ExecutableNotFound { path: String },

    /// Version string could not be compared
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Operation cancelled through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Spawning the application process failed
    #[error("Failed to launch {path}: {source}")]
    Launch {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Marker file or download file IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] forge_launcher_core::Error),
}

impl Error {
    /// Create a network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(archive: &Path, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.display().to_string(),
            message: message.into(),
        }
    }

    /// Create an executable not found error
    pub fn executable_not_found(path: &Path) -> Self {
        Self::ExecutableNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Create a launch error
    pub fn launch(path: &Path, source: std::io::Error) -> Self {
        Self::Launch {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether this error came from cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
