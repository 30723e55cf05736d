//! Artifact download with progress tracking and cancellation
//!
//! This module fetches listing pages as text and streams archives to disk.
//! Every suspending call races against a [`CancellationToken`]. Nothing is
//! retried: a failed fetch surfaces as [`Error::Network`].
//!
//! # Example
//!
//! ```no_run
//! use forge_launcher_update::{ArtifactFetcher, CancellationToken};
//! use forge_launcher_core::LauncherConfig;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> forge_launcher_update::Result<()> {
//!     let fetcher = ArtifactFetcher::from_config(&LauncherConfig::default())?;
//!     let cancel = CancellationToken::new();
//!     let bytes = fetcher
//!         .fetch_file(
//!             "https://downloads.cardforge.org/dailysnapshots/latest.tar.bz2",
//!             Path::new("/tmp/latest.tar.bz2"),
//!             &|progress| println!("{:?}", progress.percentage()),
//!             &cancel,
//!         )
//!         .await?;
//!     println!("Downloaded {} bytes", bytes);
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use forge_launcher_core::{LauncherConfig, NetworkConfig};
use futures_util::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Download progress information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadProgress {
    /// Total bytes to download, if the server announced it
    pub total_bytes: Option<u64>,

    /// Bytes downloaded so far
    pub bytes_read: u64,
}

impl DownloadProgress {
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            total_bytes,
            bytes_read: 0,
        }
    }

    /// Progress percentage (0-100), when the total is known
    pub fn percentage(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => Some((self.bytes_read as f64 / total as f64) * 100.0),
            Some(_) => Some(100.0),
            None => None,
        }
    }

    /// Check if download is complete
    pub fn is_complete(&self) -> bool {
        self.total_bytes
            .is_some_and(|total| self.bytes_read >= total)
    }
}

/// Fetches listing pages and artifacts over HTTP
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    /// HTTP client
    client: reqwest::Client,

    /// Timeout for text fetches
    text_timeout: Duration,

    /// Timeout for file downloads
    download_timeout: Duration,

    /// Chunk reads between progress reports
    progress_interval: u64,
}

impl ArtifactFetcher {
    /// Create a fetcher from network settings
    pub fn new(network: &NetworkConfig, progress_interval: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .build()
            .map_err(|e| Error::network("", format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            text_timeout: Duration::from_secs(network.http_timeout_secs),
            download_timeout: Duration::from_secs(network.download_timeout_secs),
            progress_interval: progress_interval.max(1),
        })
    }

    /// Create a fetcher from the launcher configuration
    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        Self::new(&config.network, config.download.progress_interval)
    }

    /// Fetch `url` as text in a single attempt
    pub async fn fetch_text(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        debug!("Fetching {}", url);
        let request = self.client.get(url).timeout(self.text_timeout).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = request => response.map_err(|e| Error::network(url, e.to_string()))?,
        };
        check_status(url, &response)?;

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            body = response.text() => body.map_err(|e| Error::network(url, e.to_string())),
        }
    }

    /// Stream `url` into a freshly created file at `destination`.
    ///
    /// `on_progress` is called every `progress_interval` chunk reads and once
    /// on completion. On failure or cancellation the partially written file
    /// is left in place; removing it is up to the caller.
    ///
    /// Returns the number of bytes written.
    pub async fn fetch_file(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &(dyn Fn(DownloadProgress) + Send + Sync),
        cancel: &CancellationToken,
    ) -> Result<u64> {
        debug!("Downloading {} to {}", url, destination.display());
        let request = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = request => response.map_err(|e| Error::network(url, e.to_string()))?,
        };
        check_status(url, &response)?;

        let total_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| ct.parse::<u64>().ok());

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(destination).await?;

        let mut progress = DownloadProgress::new(total_bytes);
        let mut reads: u64 = 0;
        let mut stream = response.bytes_stream();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                next = stream.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(|e| Error::network(url, e.to_string()))?;
            file.write_all(&chunk).await?;

            progress.bytes_read += chunk.len() as u64;
            reads += 1;
            if reads % self.progress_interval == 0 {
                on_progress(progress);
            }
        }

        file.flush().await?;
        on_progress(progress);
        debug!("Downloaded {} bytes from {}", progress.bytes_read, url);

        Ok(progress.bytes_read)
    }
}

fn check_status(url: &str, response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::network(url, format!("server returned {}", status)));
    }
    Ok(())
}
