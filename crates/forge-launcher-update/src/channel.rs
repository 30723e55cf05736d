//! Version sources
//!
//! A [`VersionSource`] knows where one product is installed, where its
//! latest version is published and how the two versions compare. The
//! orchestrator drives any source through the same workflow.
//!
//! - [`SnapshotChannel`]: the Forge application, published as daily
//!   snapshot archives in a directory listing
//! - [`ReleaseChannel`]: the launcher itself, published as tagged releases

use crate::download::ArtifactFetcher;
use crate::error::Result;
use crate::listing::{parse_release_listing, parse_snapshot_listing, ReleaseDescriptor};
use crate::local::{resolve_local, LocalInstallation, MarkerFile};
use crate::version::{is_release_outdated, is_snapshot_outdated};
use async_trait::async_trait;
use forge_launcher_core::LauncherSettings;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A product whose installed and published versions can be resolved
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Product name used in user-facing messages
    fn display_name(&self) -> &str;

    /// Folder the product is installed (unpacked) into
    fn install_dir(&self) -> &Path;

    /// Resolve the installed version
    fn local(&self) -> LocalInstallation;

    /// Resolve the latest published version
    async fn remote(
        &self,
        fetcher: &ArtifactFetcher,
        cancel: &CancellationToken,
    ) -> Result<ReleaseDescriptor>;

    /// Whether `local` is older than `remote`
    fn is_outdated(&self, local: &str, remote: &str) -> Result<bool>;

    /// Download URL of a published artifact
    fn download_url(&self, release: &ReleaseDescriptor) -> String;

    /// Record `release` as installed
    fn persist(&self, release: &ReleaseDescriptor) -> Result<()>;

    /// Executable to start after installing, if the product has one
    fn executable(&self) -> Option<PathBuf>;
}

/// Join a base URL and a file name with exactly one slash
fn join_url(base: &str, filename: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, filename)
    } else {
        format!("{}/{}", base, filename)
    }
}

/// The Forge application, installed from daily snapshot archives
#[derive(Debug, Clone)]
pub struct SnapshotChannel {
    install_dir: PathBuf,
    listing_url: String,
    artifact_stem: String,
    archive_extension: String,
    executable: PathBuf,
    marker: MarkerFile,
}

impl SnapshotChannel {
    /// Channel with default artifact naming
    pub fn new(install_dir: impl Into<PathBuf>, listing_url: impl Into<String>) -> Self {
        Self::from_settings(&LauncherSettings {
            install_folder: install_dir.into(),
            snapshot_listing_url: listing_url.into(),
            ..Default::default()
        })
    }

    pub fn from_settings(settings: &LauncherSettings) -> Self {
        Self {
            install_dir: settings.install_folder.clone(),
            listing_url: settings.snapshot_listing_url.clone(),
            artifact_stem: settings.artifact_stem.clone(),
            archive_extension: settings.archive_extension.clone(),
            executable: settings.executable_path(),
            marker: MarkerFile::new(settings.install_folder.join(&settings.marker_file_name)),
        }
    }

    /// Set the executable started after installing
    pub fn with_executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable = self.install_dir.join(name.into());
        self
    }

    pub fn marker(&self) -> &MarkerFile {
        &self.marker
    }
}

#[async_trait]
impl VersionSource for SnapshotChannel {
    fn display_name(&self) -> &str {
        "Forge"
    }

    fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    fn local(&self) -> LocalInstallation {
        resolve_local(&self.install_dir, &self.marker, &self.artifact_stem)
    }

    async fn remote(
        &self,
        fetcher: &ArtifactFetcher,
        cancel: &CancellationToken,
    ) -> Result<ReleaseDescriptor> {
        let body = fetcher.fetch_text(&self.listing_url, cancel).await?;
        parse_snapshot_listing(&body, &self.artifact_stem, &self.archive_extension)
    }

    fn is_outdated(&self, local: &str, remote: &str) -> Result<bool> {
        Ok(is_snapshot_outdated(local, remote))
    }

    fn download_url(&self, release: &ReleaseDescriptor) -> String {
        join_url(&self.listing_url, &release.artifact_filename)
    }

    fn persist(&self, release: &ReleaseDescriptor) -> Result<()> {
        self.marker.write(&release.version)?;
        debug!(
            "Recorded version {} in {}",
            release.version,
            self.marker.path().display()
        );
        Ok(())
    }

    fn executable(&self) -> Option<PathBuf> {
        Some(self.executable.clone())
    }
}

/// The launcher itself, updated from tagged releases
///
/// The running binary carries its own version, so nothing is persisted.
/// New releases are unpacked into a staging folder rather than over the
/// running executable.
#[derive(Debug, Clone)]
pub struct ReleaseChannel {
    current_version: String,
    staging_dir: PathBuf,
    listing_url: String,
    tag_anchor: String,
    download_url: String,
    artifact_name: String,
}

impl ReleaseChannel {
    pub fn from_settings(
        settings: &LauncherSettings,
        current_version: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            current_version: current_version.into(),
            staging_dir: staging_dir.into(),
            listing_url: settings.release_listing_url.clone(),
            tag_anchor: settings.release_tag_anchor.clone(),
            download_url: settings.release_download_url.clone(),
            artifact_name: settings.release_artifact_name.clone(),
        }
    }
}

#[async_trait]
impl VersionSource for ReleaseChannel {
    fn display_name(&self) -> &str {
        "Forge Launcher"
    }

    fn install_dir(&self) -> &Path {
        &self.staging_dir
    }

    fn local(&self) -> LocalInstallation {
        LocalInstallation {
            version: Some(self.current_version.clone()),
            install_path: self.staging_dir.clone(),
        }
    }

    async fn remote(
        &self,
        fetcher: &ArtifactFetcher,
        cancel: &CancellationToken,
    ) -> Result<ReleaseDescriptor> {
        let body = fetcher.fetch_text(&self.listing_url, cancel).await?;
        parse_release_listing(&body, &self.tag_anchor, &self.artifact_name)
    }

    fn is_outdated(&self, local: &str, remote: &str) -> Result<bool> {
        is_release_outdated(local, remote)
    }

    fn download_url(&self, release: &ReleaseDescriptor) -> String {
        let base = self.download_url.replace("{version}", &release.version);
        join_url(&base, &release.artifact_filename)
    }

    fn persist(&self, release: &ReleaseDescriptor) -> Result<()> {
        debug!(
            "Launcher {} staged in {}",
            release.version,
            self.staging_dir.display()
        );
        Ok(())
    }

    fn executable(&self) -> Option<PathBuf> {
        None
    }
}
