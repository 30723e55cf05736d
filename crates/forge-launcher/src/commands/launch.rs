//! Launch command: the default workflow

use anyhow::{Context, Result};
use forge_launcher_core::LauncherConfig;
use forge_launcher_update::{CancellationToken, LaunchedProcess};
use std::sync::Arc;

use crate::cli::LaunchArgs;
use crate::output;
use crate::workflow::{self, ConsoleObserver, PromptConfirmation};

pub async fn run(
    args: LaunchArgs,
    config: LauncherConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let observer = Arc::new(ConsoleObserver::new());
    let orchestrator =
        workflow::snapshot_orchestrator(&config, observer)?.with_launch(!args.no_launch);
    let confirmation = PromptConfirmation::new("Forge", args.yes);

    let report = orchestrator.run(&confirmation, &cancel).await;
    if let Some(error) = report.error {
        return Err(error.into());
    }
    if report.declined {
        return Ok(());
    }

    match report.process {
        Some(process) if config.settings.close_on_launch => {
            output::success(&format!("Forge started (pid {})", process.pid()));
            Ok(())
        }
        Some(process) => wait_for_exit(process).await,
        None => {
            if report.installed {
                output::success("Forge is ready; launch skipped");
            }
            Ok(())
        }
    }
}

/// Stay attached until the application exits
async fn wait_for_exit(process: LaunchedProcess) -> Result<()> {
    output::info(&format!("Waiting for Forge to exit (pid {})...", process.pid()));
    let status = tokio::task::spawn_blocking(move || process.wait())
        .await
        .context("Failed to wait for Forge")??;

    match status {
        Some(status) if status.success() => output::success("Forge exited"),
        Some(status) => output::warning(&format!("Forge exited with {}", status)),
        None => {}
    }
    Ok(())
}
