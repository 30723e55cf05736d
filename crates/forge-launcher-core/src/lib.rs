//! # forge-launcher-core
//!
//! Core library for Forge Launcher providing:
//! - Launcher settings and runtime configuration types
//! - Hierarchical configuration loading (defaults, YAML file, environment)
//! - Shared filesystem helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::{DownloadConfig, LauncherConfig, LauncherSettings, NetworkConfig, SETTING_KEYS};
pub use utils::get_home_dir;
