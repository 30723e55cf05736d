//! Version resolution and update orchestration for Forge Launcher
//!
//! Provides:
//! - Dotted version comparison and the snapshot/release outdated checks
//! - Local version detection (marker file, installed artifact scan)
//! - Remote version detection from directory listings and release pages
//! - Cancellable artifact download with progress reporting
//! - Hardened tar.bz2 / tar.gz extraction
//! - The check → download → unpack → persist → launch workflow

pub mod channel;
pub mod download;
pub mod error;
pub mod extract;
pub mod launch;
pub mod listing;
pub mod local;
pub mod observer;
pub mod orchestrator;
pub mod version;

pub use channel::{ReleaseChannel, SnapshotChannel, VersionSource};
pub use download::{ArtifactFetcher, DownloadProgress};
pub use error::{Error, Result};
pub use extract::{ArchiveExtractor, ArchiveFormat, ExtractionSummary};
pub use launch::{LaunchedProcess, ProcessLauncher, SystemLauncher};
pub use listing::ReleaseDescriptor;
pub use local::{LocalInstallation, MarkerFile};
pub use observer::{LogLevel, NoOpObserver, TracingObserver, WorkflowObserver};
pub use orchestrator::{
    AlwaysConfirm, Confirmation, RequiredAction, RunReport, UpdateDecision, UpdateOrchestrator,
    UpdatePlan, WorkflowState,
};
pub use tokio_util::sync::CancellationToken;

/// Current launcher version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
