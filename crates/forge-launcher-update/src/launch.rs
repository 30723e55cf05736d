//! Starting the installed application

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// Starts the application as an independent OS process
pub trait ProcessLauncher: Send + Sync {
    /// Start `executable` with `working_dir` as its working directory
    fn launch(&self, executable: &Path, working_dir: &Path) -> Result<LaunchedProcess>;
}

/// Handle to a started application
#[derive(Debug)]
pub struct LaunchedProcess {
    pid: u32,
    child: Option<Child>,
}

impl LaunchedProcess {
    /// Wrap a spawned child process
    pub fn from_child(child: Child) -> Self {
        Self {
            pid: child.id(),
            child: Some(child),
        }
    }

    /// A process that cannot be waited on
    pub fn detached(pid: u32) -> Self {
        Self { pid, child: None }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Block until the process exits. Returns `None` for detached handles.
    pub fn wait(self) -> Result<Option<ExitStatus>> {
        match self.child {
            Some(mut child) => Ok(Some(child.wait()?)),
            None => Ok(None),
        }
    }
}

/// Launches processes through `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, executable: &Path, working_dir: &Path) -> Result<LaunchedProcess> {
        if !executable.is_file() {
            return Err(Error::executable_not_found(executable));
        }

        debug!(
            "Spawning {} in {}",
            executable.display(),
            working_dir.display()
        );
        let child = Command::new(executable)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::launch(executable, e))?;

        info!("Started {} (pid {})", executable.display(), child.id());
        Ok(LaunchedProcess::from_child(child))
    }
}
