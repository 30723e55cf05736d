//! Workflow observation
//!
//! The orchestrator reports state transitions, user-facing log lines and
//! download progress through a [`WorkflowObserver`]. Observers may be called
//! from any task, so implementations must be `Send + Sync` and return quickly.

use crate::download::DownloadProgress;
use crate::orchestrator::WorkflowState;
use tracing::{debug, error, info, warn};

/// Severity of a workflow log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Observer trait for update workflow events
///
/// # Example
///
/// ```rust
/// use forge_launcher_update::{DownloadProgress, LogLevel, WorkflowObserver, WorkflowState};
///
/// struct StatusLine;
///
/// impl WorkflowObserver for StatusLine {
///     fn on_state(&self, state: &WorkflowState) {
///         eprintln!("now {:?}", state);
///     }
///
///     fn on_log(&self, level: LogLevel, message: &str) {
///         if level != LogLevel::Debug {
///             eprintln!("{}", message);
///         }
///     }
///
///     fn on_progress(&self, progress: DownloadProgress) {
///         eprintln!("{} bytes", progress.bytes_read);
///     }
/// }
/// ```
pub trait WorkflowObserver: Send + Sync {
    /// Called on every state transition
    fn on_state(&self, state: &WorkflowState) {
        let _ = state;
    }

    /// Called with each user-facing log line
    fn on_log(&self, level: LogLevel, message: &str) {
        let _ = (level, message);
    }

    /// Called with download progress
    fn on_progress(&self, progress: DownloadProgress) {
        let _ = progress;
    }
}

/// An observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl WorkflowObserver for NoOpObserver {}

/// An observer that forwards workflow events to `tracing`
///
/// # Log Levels
///
/// - `on_state`: DEBUG
/// - `on_log`: the line's own level
/// - `on_progress`: DEBUG, only once the download completes
#[derive(Debug, Clone)]
pub struct TracingObserver {
    workflow: String,
}

impl TracingObserver {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
        }
    }
}

impl WorkflowObserver for TracingObserver {
    fn on_state(&self, state: &WorkflowState) {
        debug!(workflow = %self.workflow, "State: {:?}", state);
    }

    fn on_log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(workflow = %self.workflow, "{}", message),
            LogLevel::Info => info!(workflow = %self.workflow, "{}", message),
            LogLevel::Warn => warn!(workflow = %self.workflow, "{}", message),
            LogLevel::Error => error!(workflow = %self.workflow, "{}", message),
        }
    }

    fn on_progress(&self, progress: DownloadProgress) {
        if progress.is_complete() {
            debug!(
                workflow = %self.workflow,
                "Download complete: {} bytes",
                progress.bytes_read
            );
        }
    }
}
