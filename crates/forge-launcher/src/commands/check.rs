//! Check command

use anyhow::Result;
use forge_launcher_core::LauncherConfig;
use forge_launcher_update::{
    CancellationToken, RequiredAction, TracingObserver, UpdateDecision, UpdatePlan,
    WorkflowObserver,
};
use serde::Serialize;
use std::sync::Arc;

use crate::cli::CheckArgs;
use crate::output;
use crate::workflow::{self, ConsoleObserver};

/// Machine-readable check result
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    install_folder: String,
    local_version: Option<&'a str>,
    server_version: &'a str,
    artifact: &'a str,
    decision: UpdateDecision,
    action: RequiredAction,
}

impl<'a> From<&'a UpdatePlan> for CheckReport<'a> {
    fn from(plan: &'a UpdatePlan) -> Self {
        Self {
            install_folder: plan.local.install_path.display().to_string(),
            local_version: plan.local.version.as_deref(),
            server_version: &plan.release.version,
            artifact: &plan.release.artifact_filename,
            decision: plan.decision,
            action: plan.required_action(),
        }
    }
}

pub async fn run(
    args: CheckArgs,
    config: LauncherConfig,
    cancel: CancellationToken,
) -> Result<()> {
    // Keep stdout clean for JSON
    let observer: Arc<dyn WorkflowObserver> = if args.json {
        Arc::new(TracingObserver::new("check"))
    } else {
        Arc::new(ConsoleObserver::new())
    };
    let orchestrator = workflow::snapshot_orchestrator(&config, observer)?;
    let plan = orchestrator.check(&cancel).await?;
    let report = CheckReport::from(&plan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header("Forge");
    output::kv("Install folder", &report.install_folder);
    output::kv("Local version", report.local_version.unwrap_or("not installed"));
    output::kv("Server version", report.server_version);
    output::kv("Status", &plan.decision.to_string());

    match report.action {
        RequiredAction::Install => {
            output::info("Run 'forge-launcher update' to install Forge");
        }
        RequiredAction::Update => {
            output::info("Run 'forge-launcher update' to install the new version");
        }
        RequiredAction::None => output::success("Forge is up to date"),
    }
    Ok(())
}
