//! Update command

use anyhow::Result;
use forge_launcher_core::LauncherConfig;
use forge_launcher_update::{CancellationToken, Confirmation, RequiredAction, VersionSource};
use std::sync::Arc;

use crate::cli::UpdateArgs;
use crate::output;
use crate::workflow::{self, ConsoleObserver, PromptConfirmation};

pub async fn run(
    args: UpdateArgs,
    config: LauncherConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let orchestrator =
        workflow::snapshot_orchestrator(&config, Arc::new(ConsoleObserver::new()))?;
    let plan = orchestrator.check(&cancel).await?;
    let confirmation = PromptConfirmation::new("Forge", args.yes);

    let proceed = match plan.required_action() {
        RequiredAction::None if !args.force => {
            output::success(&format!(
                "Forge {} is already up to date",
                plan.release.version
            ));
            return Ok(());
        }
        RequiredAction::None => confirmation.confirm_reinstall(&plan),
        RequiredAction::Install | RequiredAction::Update => confirmation.confirm(&plan),
    };
    if !proceed {
        output::info("Cancelled by user.");
        return Ok(());
    }

    let summary = orchestrator.apply(&plan, &cancel).await?;
    output::success(&format!(
        "Forge {} installed in {} ({} files)",
        plan.release.version,
        orchestrator.source().install_dir().display(),
        summary.files_written
    ));
    if summary.sanitized > 0 {
        output::warning(&format!(
            "{} entries had invalid names and were written to the install folder root",
            summary.sanitized
        ));
    }
    Ok(())
}
