//! Observer and launcher doubles

use forge_launcher_core::{LauncherSettings, NetworkConfig};
use forge_launcher_update::{
    ArchiveExtractor, ArtifactFetcher, CancellationToken, DownloadProgress, LaunchedProcess,
    LogLevel, ProcessLauncher, SnapshotChannel, UpdateOrchestrator, WorkflowObserver,
    WorkflowState,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::constants::*;

/// Records every workflow event; optionally cancels a token on entering a state
#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<WorkflowState>>,
    logs: Mutex<Vec<(LogLevel, String)>>,
    progress: Mutex<Vec<DownloadProgress>>,
    cancel_on: Option<(WorkflowState, CancellationToken)>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Observer that cancels `token` when the workflow enters `state`
    pub fn cancelling_on(state: WorkflowState, token: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            cancel_on: Some((state, token)),
            ..Default::default()
        })
    }

    pub fn states(&self) -> Vec<WorkflowState> {
        self.states.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.logs.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<DownloadProgress> {
        self.progress.lock().unwrap().clone()
    }

    pub fn saw_state(&self, state: &WorkflowState) -> bool {
        self.states().iter().any(|s| s == state)
    }

    pub fn logged(&self, message: &str) -> bool {
        self.logs().iter().any(|(_, line)| line == message)
    }
}

impl WorkflowObserver for RecordingObserver {
    fn on_state(&self, state: &WorkflowState) {
        self.states.lock().unwrap().push(state.clone());
        if let Some((trigger, token)) = &self.cancel_on {
            if trigger == state {
                token.cancel();
            }
        }
    }

    fn on_log(&self, level: LogLevel, message: &str) {
        self.logs.lock().unwrap().push((level, message.to_string()));
    }

    fn on_progress(&self, progress: DownloadProgress) {
        self.progress.lock().unwrap().push(progress);
    }
}

/// Launcher that records launches instead of spawning processes
#[derive(Default)]
pub struct RecordingLauncher {
    launches: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl RecordingLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// (executable, working directory) of every launch
    pub fn launches(&self) -> Vec<(PathBuf, PathBuf)> {
        self.launches.lock().unwrap().clone()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(
        &self,
        executable: &Path,
        working_dir: &Path,
    ) -> forge_launcher_update::Result<LaunchedProcess> {
        self.launches
            .lock()
            .unwrap()
            .push((executable.to_path_buf(), working_dir.to_path_buf()));
        Ok(LaunchedProcess::detached(4242))
    }
}

/// Fetcher with short timeouts that reports progress on every chunk
pub fn test_fetcher() -> ArtifactFetcher {
    let network = NetworkConfig {
        http_timeout_secs: 10,
        download_timeout_secs: 10,
        ..Default::default()
    };
    ArtifactFetcher::new(&network, 1).unwrap()
}

/// Snapshot settings pointing at a mock listing
pub fn snapshot_settings(install_dir: &Path, listing_url: &str) -> LauncherSettings {
    LauncherSettings {
        install_folder: install_dir.to_path_buf(),
        executable_name: EXECUTABLE_NAME.to_string(),
        snapshot_listing_url: listing_url.to_string(),
        marker_file_name: MARKER_FILE_NAME.to_string(),
        ..Default::default()
    }
}

/// Orchestrator for the snapshot channel wired to recording doubles
pub fn snapshot_orchestrator(
    install_dir: &Path,
    listing_url: &str,
    download_dir: &Path,
    observer: Arc<RecordingObserver>,
    launcher: Arc<RecordingLauncher>,
) -> UpdateOrchestrator<SnapshotChannel> {
    let channel = SnapshotChannel::from_settings(&snapshot_settings(install_dir, listing_url));
    UpdateOrchestrator::new(
        channel,
        test_fetcher(),
        ArchiveExtractor::new(),
        launcher,
        observer,
    )
    .with_download_dir(download_dir)
}
