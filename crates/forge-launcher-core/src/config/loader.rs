//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Config file (~/.forge-launcher/config.yaml)
//! 3. Environment variables (FORGE_LAUNCHER_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::LauncherConfig;
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Name of the YAML config file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at the standard config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the standard config directory (~/.forge-launcher)
    fn default_config_dir() -> Result<Utf8PathBuf> {
        let home = get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {:?}", p)))?;
        Ok(home.join(".forge-launcher"))
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Path of the config file
    pub fn config_path(&self) -> Utf8PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load configuration with full precedence, environment included
    pub fn load(&self) -> Result<LauncherConfig> {
        let config = self.load_persisted()?;
        apply_env_overrides(config)
    }

    /// Load defaults overlaid with the config file, ignoring the environment
    ///
    /// Used when editing settings so that transient environment overrides
    /// are not written back to disk.
    pub fn load_persisted(&self) -> Result<LauncherConfig> {
        let path = self.config_path();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path);
            return Ok(LauncherConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(LauncherConfig::default());
        }
        let config: LauncherConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;
        debug!("Loaded config from {}", path);
        Ok(config)
    }

    /// Write the configuration to the config file, creating the directory
    pub fn save(&self, config: &LauncherConfig) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        let content = serde_yaml_ng::to_string(config)?;
        fs::write(self.config_path(), content)?;
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, expected: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be {}", name, expected))),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides
fn apply_env_overrides(mut config: LauncherConfig) -> Result<LauncherConfig> {
    if let Ok(val) = env::var("FORGE_LAUNCHER_INSTALL_FOLDER") {
        config.settings.install_folder = PathBuf::from(val);
    }

    if let Ok(val) = env::var("FORGE_LAUNCHER_EXECUTABLE") {
        config.settings.executable_name = val;
    }

    if let Ok(val) = env::var("FORGE_LAUNCHER_SNAPSHOT_URL") {
        config.settings.snapshot_listing_url = val;
    }

    if let Ok(val) = env::var("FORGE_LAUNCHER_RELEASE_URL") {
        config.settings.release_listing_url = val;
    }

    if let Some(val) = parse_env("FORGE_LAUNCHER_CLOSE_ON_LAUNCH", "true or false")? {
        config.settings.close_on_launch = val;
    }

    if let Some(val) = parse_env("FORGE_LAUNCHER_HTTP_TIMEOUT_SECS", "a valid number")? {
        config.network.http_timeout_secs = val;
    }

    if let Some(val) = parse_env("FORGE_LAUNCHER_DOWNLOAD_TIMEOUT_SECS", "a valid number")? {
        config.network.download_timeout_secs = val;
    }

    if let Some(val) = parse_env("FORGE_LAUNCHER_PROGRESS_INTERVAL", "a valid number")? {
        config.download.progress_interval = val;
    }

    if let Ok(val) = env::var("FORGE_LAUNCHER_DOWNLOAD_DIR") {
        config.download.download_dir = Some(PathBuf::from(val));
    }

    Ok(config)
}
