//! Self-update command

use anyhow::Result;
use forge_launcher_core::LauncherConfig;
use forge_launcher_update::{
    CancellationToken, Confirmation, RequiredAction, VersionSource, VERSION,
};
use std::sync::Arc;

use crate::cli::SelfUpdateArgs;
use crate::output;
use crate::workflow::{self, ConsoleObserver, PromptConfirmation};

pub async fn run(
    args: SelfUpdateArgs,
    config: LauncherConfig,
    cancel: CancellationToken,
) -> Result<()> {
    output::info(&format!("Current version: {}", VERSION));

    let orchestrator =
        workflow::release_orchestrator(&config, Arc::new(ConsoleObserver::new()))?;
    let plan = orchestrator.check(&cancel).await?;

    if plan.required_action() == RequiredAction::None {
        output::success("Already on the latest version");
        return Ok(());
    }

    output::success(&format!("Update available: {}", plan.release.version));
    if args.check {
        output::info("Run 'forge-launcher self-update' to download it");
        return Ok(());
    }

    if !PromptConfirmation::new("Forge Launcher", args.yes).confirm(&plan) {
        output::info("Cancelled by user.");
        return Ok(());
    }

    orchestrator.apply(&plan, &cancel).await?;
    let staging = orchestrator.source().install_dir();
    output::success(&format!(
        "Forge Launcher {} staged in {}",
        plan.release.version,
        staging.display()
    ));
    output::info("Replace this launcher with the staged files to finish the update");
    Ok(())
}
