//! Launcher configuration types
//!
//! `LauncherSettings` is the user-editable part (install folder, listing
//! URLs, launch behavior). `NetworkConfig` and `DownloadConfig` hold the
//! operational knobs for fetching artifacts.

use crate::error::{Error, Result};
use crate::utils::executable_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete launcher configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LauncherConfig {
    /// Installation and listing settings
    #[serde(default)]
    pub settings: LauncherSettings,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Download behavior
    #[serde(default)]
    pub download: DownloadConfig,
}

/// User-facing launcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LauncherSettings {
    /// Folder the application is installed into
    #[serde(default = "default_install_folder")]
    pub install_folder: PathBuf,

    /// Executable started on launch, relative to the install folder
    #[serde(default = "default_executable_name")]
    pub executable_name: String,

    /// Directory listing that publishes daily snapshot archives
    #[serde(default = "default_snapshot_listing_url")]
    pub snapshot_listing_url: String,

    /// Release page used to detect new launcher versions
    #[serde(default = "default_release_listing_url")]
    pub release_listing_url: String,

    /// Anchor prefix preceding the version tag on the release page
    #[serde(default = "default_release_tag_anchor")]
    pub release_tag_anchor: String,

    /// Base URL for launcher release artifacts; `{version}` is substituted
    #[serde(default = "default_release_download_url")]
    pub release_download_url: String,

    /// Fixed file name of the launcher release artifact
    #[serde(default = "default_release_artifact_name")]
    pub release_artifact_name: String,

    /// File name prefix of published application archives
    #[serde(default = "default_artifact_stem")]
    pub artifact_stem: String,

    /// Expected extension of published application archives
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Marker file in the install folder holding the installed version
    #[serde(default = "default_marker_file_name")]
    pub marker_file_name: String,

    /// Exit the launcher as soon as the application has started
    #[serde(default = "default_close_on_launch")]
    pub close_on_launch: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            install_folder: default_install_folder(),
            executable_name: default_executable_name(),
            snapshot_listing_url: default_snapshot_listing_url(),
            release_listing_url: default_release_listing_url(),
            release_tag_anchor: default_release_tag_anchor(),
            release_download_url: default_release_download_url(),
            release_artifact_name: default_release_artifact_name(),
            artifact_stem: default_artifact_stem(),
            archive_extension: default_archive_extension(),
            marker_file_name: default_marker_file_name(),
            close_on_launch: default_close_on_launch(),
        }
    }
}

/// Keys accepted by [`LauncherSettings::set`], in display order
pub const SETTING_KEYS: &[&str] = &[
    "install-folder",
    "executable-name",
    "snapshot-listing-url",
    "release-listing-url",
    "release-tag-anchor",
    "release-download-url",
    "release-artifact-name",
    "artifact-stem",
    "archive-extension",
    "marker-file-name",
    "close-on-launch",
];

impl LauncherSettings {
    /// Full path of the executable started on launch
    pub fn executable_path(&self) -> PathBuf {
        self.install_folder.join(&self.executable_name)
    }

    /// Update a single setting from its kebab-case key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "install-folder" => self.install_folder = PathBuf::from(value),
            "executable-name" => self.executable_name = non_empty(key, value)?,
            "snapshot-listing-url" => self.snapshot_listing_url = parse_url(key, value)?,
            "release-listing-url" => self.release_listing_url = parse_url(key, value)?,
            "release-tag-anchor" => self.release_tag_anchor = non_empty(key, value)?,
            // May contain a `{version}` placeholder, so only the prefix is checked
            "release-download-url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(Error::invalid_config(format!(
                        "{} must be an http(s) URL",
                        key
                    )));
                }
                self.release_download_url = value.to_string();
            }
            "release-artifact-name" => self.release_artifact_name = non_empty(key, value)?,
            "artifact-stem" => self.artifact_stem = non_empty(key, value)?,
            "archive-extension" => self.archive_extension = non_empty(key, value)?,
            "marker-file-name" => self.marker_file_name = non_empty(key, value)?,
            "close-on-launch" => {
                self.close_on_launch = value.parse().map_err(|_| {
                    Error::invalid_config(format!("{} must be true or false", key))
                })?
            }
            _ => return Err(Error::unknown_setting(key)),
        }
        Ok(())
    }

    /// Read a single setting by its kebab-case key
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "install-folder" => self.install_folder.display().to_string(),
            "executable-name" => self.executable_name.clone(),
            "snapshot-listing-url" => self.snapshot_listing_url.clone(),
            "release-listing-url" => self.release_listing_url.clone(),
            "release-tag-anchor" => self.release_tag_anchor.clone(),
            "release-download-url" => self.release_download_url.clone(),
            "release-artifact-name" => self.release_artifact_name.clone(),
            "artifact-stem" => self.artifact_stem.clone(),
            "archive-extension" => self.archive_extension.clone(),
            "marker-file-name" => self.marker_file_name.clone(),
            "close-on-launch" => self.close_on_launch.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_config(format!("{} must not be empty", key)));
    }
    Ok(trimmed.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<String> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::invalid_config(format!("{} is not a valid URL: {}", key, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(Error::invalid_config(format!(
            "{} must use http or https, got {}",
            key, other
        ))),
    }
}

fn default_install_folder() -> PathBuf {
    executable_dir()
}
fn default_executable_name() -> String {
    if cfg!(windows) {
        "forge.exe".to_string()
    } else {
        "forge.sh".to_string()
    }
}
fn default_snapshot_listing_url() -> String {
    "https://downloads.cardforge.org/dailysnapshots/".to_string()
}
fn default_release_listing_url() -> String {
    "https://github.com/SinaC/ForgeLauncher/releases".to_string()
}
fn default_release_tag_anchor() -> String {
    "<a href=\"/SinaC/ForgeLauncher/releases/tag/".to_string()
}
fn default_release_download_url() -> String {
    "https://github.com/SinaC/ForgeLauncher/releases/download/{version}/".to_string()
}
fn default_release_artifact_name() -> String {
    format!(
        "forge-launcher-{}-{}.tar.gz",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
fn default_artifact_stem() -> String {
    "forge-gui-desktop".to_string()
}
fn default_archive_extension() -> String {
    ".tar.bz2".to_string()
}
fn default_marker_file_name() -> String {
    "forge-launcher.last-version".to_string()
}
fn default_close_on_launch() -> bool {
    true
}

/// Network and HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for fetching listing pages, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for a full artifact download, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    86_400 // 1 day
}
fn default_download_timeout() -> u64 {
    86_400 // 1 day
}
fn default_user_agent() -> String {
    format!(
        "forge-launcher/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Download behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DownloadConfig {
    /// Number of chunk reads between progress reports
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Where archives are downloaded before unpacking (system temp dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Where launcher self-updates are unpacked (next to the executable if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            download_dir: None,
            staging_dir: None,
        }
    }
}

impl DownloadConfig {
    /// Resolved download directory
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Resolved staging directory for launcher self-updates
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| executable_dir().join(".forge-launcher-update"))
    }
}

fn default_progress_interval() -> u64 {
    100
}
