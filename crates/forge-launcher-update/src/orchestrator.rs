//! Update orchestration
//!
//! [`UpdateOrchestrator`] runs one product through
//! `CheckingVersions → Decided → Downloading → Unpacking → Persisting →
//! Launching`, with `Error` reachable from every step. Steps run strictly in
//! sequence; the first failure is logged with the step's name and the
//! remaining steps are skipped. Nothing is retried.
//!
//! Confirmation is delegated: the orchestrator exposes the [`UpdatePlan`]
//! and asks a [`Confirmation`] whether to act on it.

use crate::channel::VersionSource;
use crate::download::{ArtifactFetcher, DownloadProgress};
use crate::error::{Error, Result};
use crate::extract::{ArchiveExtractor, ExtractionSummary};
use crate::launch::{LaunchedProcess, ProcessLauncher};
use crate::listing::ReleaseDescriptor;
use crate::local::LocalInstallation;
use crate::observer::{LogLevel, WorkflowObserver};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// Outcome of comparing the installed and published versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateDecision {
    NotInstalled,
    Outdated,
    UpToDate,
}

impl UpdateDecision {
    pub fn required_action(self) -> RequiredAction {
        match self {
            Self::NotInstalled => RequiredAction::Install,
            Self::Outdated => RequiredAction::Update,
            Self::UpToDate => RequiredAction::None,
        }
    }
}

impl fmt::Display for UpdateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "not installed"),
            Self::Outdated => write!(f, "outdated"),
            Self::UpToDate => write!(f, "up to date"),
        }
    }
}

/// What has to happen before launching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredAction {
    Install,
    Update,
    None,
}

/// Workflow states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    CheckingVersions,
    Decided(UpdateDecision),
    Downloading,
    Unpacking,
    Persisting,
    Launching,
    /// A step failed; carries the error message
    Error(String),
}

/// Installed and published versions plus the resulting decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    pub local: LocalInstallation,
    pub release: ReleaseDescriptor,
    pub decision: UpdateDecision,
}

impl UpdatePlan {
    pub fn required_action(&self) -> RequiredAction {
        self.decision.required_action()
    }
}

/// Decides whether to act on a plan
///
/// Implemented for closures, so tests and scripted callers can pass
/// `&|_plan: &UpdatePlan| true`.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, plan: &UpdatePlan) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&UpdatePlan) -> bool + Send + Sync,
{
    fn confirm(&self, plan: &UpdatePlan) -> bool {
        self(plan)
    }
}

/// Confirms every plan
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _plan: &UpdatePlan) -> bool {
        true
    }
}

/// Result of a full [`UpdateOrchestrator::run`]
#[derive(Debug, Default)]
pub struct RunReport {
    /// The plan, if version checking succeeded
    pub plan: Option<UpdatePlan>,

    /// Whether a new artifact was downloaded and installed
    pub installed: bool,

    /// Whether the confirmation declined the plan
    pub declined: bool,

    /// The launched application, if it was started
    pub process: Option<LaunchedProcess>,

    /// The error that stopped the run
    pub error: Option<Error>,

    /// State after the run
    pub final_state: WorkflowState,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Drives a [`VersionSource`] through check, install and launch
pub struct UpdateOrchestrator<S: VersionSource> {
    source: S,
    fetcher: ArtifactFetcher,
    extractor: ArchiveExtractor,
    launcher: Arc<dyn ProcessLauncher>,
    observer: Arc<dyn WorkflowObserver>,
    download_dir: PathBuf,
    launch_after_update: bool,
    state: Mutex<WorkflowState>,
}

impl<S: VersionSource> UpdateOrchestrator<S> {
    pub fn new(
        source: S,
        fetcher: ArtifactFetcher,
        extractor: ArchiveExtractor,
        launcher: Arc<dyn ProcessLauncher>,
        observer: Arc<dyn WorkflowObserver>,
    ) -> Self {
        Self {
            source,
            fetcher,
            extractor,
            launcher,
            observer,
            download_dir: std::env::temp_dir(),
            launch_after_update: true,
            state: Mutex::new(WorkflowState::Idle),
        }
    }

    /// Directory archives are downloaded into before unpacking
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Whether [`run`](Self::run) launches the application at the end
    pub fn with_launch(mut self, launch: bool) -> Self {
        self.launch_after_update = launch;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Current workflow state
    pub fn state(&self) -> WorkflowState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn transition(&self, state: WorkflowState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        self.observer.on_state(&state);
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.observer.on_log(level, message);
    }

    /// Log a step failure, enter `Error` and hand the error back
    fn fail(&self, step: &str, error: Error) -> Error {
        if error.is_cancelled() {
            self.log(LogLevel::Warn, &format!("{} cancelled", step));
        } else {
            self.log(LogLevel::Error, &format!("{} failed: {}", step, error));
        }
        self.transition(WorkflowState::Error(error.to_string()));
        error
    }

    /// Resolve both versions and classify them
    pub async fn check(&self, cancel: &CancellationToken) -> Result<UpdatePlan> {
        self.transition(WorkflowState::CheckingVersions);
        match self.resolve_plan(cancel).await {
            Ok(plan) => {
                self.transition(WorkflowState::Decided(plan.decision));
                Ok(plan)
            }
            Err(e) => Err(self.fail("Version check", e)),
        }
    }

    async fn resolve_plan(&self, cancel: &CancellationToken) -> Result<UpdatePlan> {
        let name = self.source.display_name();

        self.log(LogLevel::Info, "Checking local version...");
        let local = self.source.local();
        match &local.version {
            Some(version) => self.log(LogLevel::Info, &format!("Local version is {}", version)),
            None => self.log(LogLevel::Info, &format!("{} is not installed!", name)),
        }

        self.log(LogLevel::Info, "Checking server version...");
        let release = self.source.remote(&self.fetcher, cancel).await?;
        self.log(
            LogLevel::Info,
            &format!("Server version is {}", release.version),
        );

        let decision = match &local.version {
            None => UpdateDecision::NotInstalled,
            Some(version) => {
                if self.source.is_outdated(version, &release.version)? {
                    UpdateDecision::Outdated
                } else {
                    UpdateDecision::UpToDate
                }
            }
        };

        Ok(UpdatePlan {
            local,
            release,
            decision,
        })
    }

    /// Download, unpack and record the release named by `plan`.
    ///
    /// Runs regardless of the plan's decision so callers can force a
    /// reinstall. The downloaded archive is removed afterwards, and also
    /// when the download fails or is cancelled.
    pub async fn apply(
        &self,
        plan: &UpdatePlan,
        cancel: &CancellationToken,
    ) -> Result<ExtractionSummary> {
        let archive_path = self.download_dir.join(&plan.release.artifact_filename);
        let url = self.source.download_url(&plan.release);

        self.transition(WorkflowState::Downloading);
        self.log(LogLevel::Info, "Downloading update...");
        let on_progress = |progress: DownloadProgress| self.observer.on_progress(progress);
        if let Err(e) = self
            .fetcher
            .fetch_file(&url, &archive_path, &on_progress, cancel)
            .await
        {
            self.discard_archive(&archive_path).await;
            return Err(self.fail("Download", e));
        }
        self.log(LogLevel::Info, "Update downloaded.");

        self.transition(WorkflowState::Unpacking);
        self.log(LogLevel::Info, "Unpacking update...");
        let summary = match self.unpack(&archive_path, cancel).await {
            Ok(summary) => summary,
            Err(e) => {
                self.discard_archive(&archive_path).await;
                return Err(self.fail("Unpacking", e));
            }
        };
        self.discard_archive(&archive_path).await;
        self.log(LogLevel::Info, "Update unpacked.");

        self.transition(WorkflowState::Persisting);
        if let Err(e) = self.source.persist(&plan.release) {
            return Err(self.fail("Saving installed version", e));
        }

        let done = match plan.decision {
            UpdateDecision::NotInstalled => "Installation complete.",
            UpdateDecision::Outdated | UpdateDecision::UpToDate => "Update complete.",
        };
        self.log(LogLevel::Info, done);
        Ok(summary)
    }

    async fn unpack(
        &self,
        archive_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<ExtractionSummary> {
        let extractor = self.extractor;
        let archive = archive_path.to_path_buf();
        let destination = self.source.install_dir().to_path_buf();
        let token = cancel.clone();

        tokio::task::spawn_blocking(move || extractor.extract(&archive, &destination, &token))
            .await
            .unwrap_or_else(|e| {
                Err(Error::extraction(
                    archive_path,
                    format!("extraction task failed: {}", e),
                ))
            })
    }

    async fn discard_archive(&self, archive_path: &Path) {
        if let Err(e) = tokio::fs::remove_file(archive_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                self.log(
                    LogLevel::Debug,
                    &format!("Could not remove {}: {}", archive_path.display(), e),
                );
            }
        }
    }

    /// Start the installed executable with the install folder as its
    /// working directory
    pub fn launch(&self) -> Result<LaunchedProcess> {
        self.transition(WorkflowState::Launching);
        let name = self.source.display_name();

        let executable = match self.source.executable() {
            Some(path) if path.is_file() => path,
            other => {
                self.log(LogLevel::Error, &format!("{} executable not found!", name));
                let path = other.unwrap_or_else(|| self.source.install_dir().to_path_buf());
                let error = Error::executable_not_found(&path);
                self.transition(WorkflowState::Error(error.to_string()));
                return Err(error);
            }
        };

        self.log(
            LogLevel::Info,
            &format!("Launching {}...", name.to_lowercase()),
        );
        match self.launcher.launch(&executable, self.source.install_dir()) {
            Ok(process) => {
                self.transition(WorkflowState::Idle);
                Ok(process)
            }
            Err(e) => Err(self.fail("Launch", e)),
        }
    }

    /// Full workflow: check, confirm, install if needed, launch.
    ///
    /// Never fails; every error is reported in the returned [`RunReport`].
    pub async fn run(
        &self,
        confirmation: &dyn Confirmation,
        cancel: &CancellationToken,
    ) -> RunReport {
        let mut report = RunReport::default();

        let plan = match self.check(cancel).await {
            Ok(plan) => plan,
            Err(e) => {
                report.error = Some(e);
                return self.finish(report);
            }
        };

        if !confirmation.confirm(&plan) {
            self.log(LogLevel::Info, "Cancelled by user.");
            self.transition(WorkflowState::Idle);
            report.plan = Some(plan);
            report.declined = true;
            return self.finish(report);
        }

        if plan.required_action() != RequiredAction::None {
            if let Err(e) = self.apply(&plan, cancel).await {
                report.plan = Some(plan);
                report.error = Some(e);
                return self.finish(report);
            }
            report.installed = true;
        }
        report.plan = Some(plan);

        if self.launch_after_update {
            match self.launch() {
                Ok(process) => report.process = Some(process),
                Err(e) => report.error = Some(e),
            }
        } else {
            self.transition(WorkflowState::Idle);
        }

        self.finish(report)
    }

    fn finish(&self, mut report: RunReport) -> RunReport {
        report.final_state = self.state();
        report
    }
}
