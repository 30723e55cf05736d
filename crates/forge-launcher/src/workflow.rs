//! Terminal front end for the update workflow
//!
//! Wires the orchestrator to the console: workflow messages are printed
//! through [`crate::output`], download progress drives an indicatif bar
//! and confirmations are asked with dialoguer.

use anyhow::Result;
use dialoguer::Confirm;
use forge_launcher_core::LauncherConfig;
use forge_launcher_update::{
    ArchiveExtractor, ArtifactFetcher, Confirmation, DownloadProgress, LogLevel, ReleaseChannel,
    SnapshotChannel, SystemLauncher, UpdateDecision, UpdateOrchestrator, UpdatePlan,
    WorkflowObserver, WorkflowState, VERSION,
};
use indicatif::ProgressBar;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::output;

/// Prints workflow events to the terminal
#[derive(Default)]
pub struct ConsoleObserver {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_bar(&self) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = bar.take() {
            bar.finish();
        }
    }
}

impl WorkflowObserver for ConsoleObserver {
    fn on_state(&self, state: &WorkflowState) {
        debug!("Workflow state: {:?}", state);
        if matches!(state, WorkflowState::Unpacking | WorkflowState::Error(_)) {
            self.finish_bar();
        }
    }

    fn on_log(&self, level: LogLevel, message: &str) {
        let print = || match level {
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Info => output::info(message),
            LogLevel::Warn => output::warning(message),
            LogLevel::Error => output::error(message),
        };

        let bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match bar.as_ref() {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }

    fn on_progress(&self, progress: DownloadProgress) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        // The fetcher may report completion twice
        if progress.is_complete() && bar.is_none() {
            return;
        }
        let pb = bar.get_or_insert_with(|| output::download_bar(progress.total_bytes));
        pb.set_position(progress.bytes_read);
        pb.set_message(output::percent_label(progress.percentage()));
        if progress.is_complete() {
            pb.finish();
            *bar = None;
        }
    }
}

/// Asks before installing or updating, unless told to assume yes
pub struct PromptConfirmation {
    subject: String,
    assume_yes: bool,
}

impl PromptConfirmation {
    pub fn new(subject: impl Into<String>, assume_yes: bool) -> Self {
        Self {
            subject: subject.into(),
            assume_yes,
        }
    }

    /// Question for `plan`, or `None` when there is nothing to confirm
    pub fn question(&self, plan: &UpdatePlan) -> Option<String> {
        match plan.decision {
            UpdateDecision::NotInstalled => Some(format!(
                "{} is not installed. Install {}?",
                self.subject, plan.release.version
            )),
            UpdateDecision::Outdated => Some(format!(
                "Update {} from {} to {}?",
                self.subject,
                plan.local.version.as_deref().unwrap_or("unknown"),
                plan.release.version
            )),
            UpdateDecision::UpToDate => None,
        }
    }

    /// Ask before reinstalling a version that is already up to date
    pub fn confirm_reinstall(&self, plan: &UpdatePlan) -> bool {
        self.ask(format!(
            "{} {} is up to date. Reinstall it?",
            self.subject, plan.release.version
        ))
    }

    fn ask(&self, question: String) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(question)
            .default(true)
            .interact()
            .unwrap_or_else(|e| {
                debug!("Confirmation prompt unavailable: {}", e);
                false
            })
    }
}

impl Confirmation for PromptConfirmation {
    fn confirm(&self, plan: &UpdatePlan) -> bool {
        match self.question(plan) {
            Some(question) => self.ask(question),
            None => true,
        }
    }
}

/// Orchestrator for the Forge snapshot channel
pub fn snapshot_orchestrator(
    config: &LauncherConfig,
    observer: Arc<dyn WorkflowObserver>,
) -> Result<UpdateOrchestrator<SnapshotChannel>> {
    let fetcher = ArtifactFetcher::from_config(config)?;
    let channel = SnapshotChannel::from_settings(&config.settings);

    Ok(UpdateOrchestrator::new(
        channel,
        fetcher,
        ArchiveExtractor::new(),
        Arc::new(SystemLauncher),
        observer,
    )
    .with_download_dir(config.download.download_dir()))
}

/// Orchestrator for the launcher's own release channel. Releases are
/// staged, never launched.
pub fn release_orchestrator(
    config: &LauncherConfig,
    observer: Arc<dyn WorkflowObserver>,
) -> Result<UpdateOrchestrator<ReleaseChannel>> {
    let fetcher = ArtifactFetcher::from_config(config)?;
    let channel =
        ReleaseChannel::from_settings(&config.settings, VERSION, config.download.staging_dir());

    Ok(UpdateOrchestrator::new(
        channel,
        fetcher,
        ArchiveExtractor::new(),
        Arc::new(SystemLauncher),
        observer,
    )
    .with_download_dir(config.download.download_dir())
    .with_launch(false))
}
