//! Forge Launcher CLI
//!
//! Keeps a local Forge installation in sync with the published daily
//! snapshots and starts it.

mod cli;
mod commands;
mod output;
mod version;
mod workflow;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use forge_launcher_core::{ConfigLoader, LauncherConfig};
use forge_launcher_update::CancellationToken;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let Cli {
        verbose,
        quiet,
        config_dir,
        install_folder,
        launch,
        command,
    } = Cli::parse();

    init_tracing(verbose, quiet);

    let command = command.unwrap_or(Commands::Launch(launch));
    match command {
        Commands::Version(args) => {
            let config = load_config(config_dir, install_folder)
                .inspect_err(|e| warn!("{:#}", e))
                .ok();
            commands::version::run(args, config.as_ref())
        }
        Commands::Config(cmd) => commands::config::run(cmd, &config_loader(config_dir)?),
        Commands::Launch(args) => {
            let config = load_config(config_dir, install_folder)?;
            commands::launch::run(args, config, cancel_on_interrupt()).await
        }
        Commands::Check(args) => {
            let config = load_config(config_dir, install_folder)?;
            commands::check::run(args, config, cancel_on_interrupt()).await
        }
        Commands::Update(args) => {
            let config = load_config(config_dir, install_folder)?;
            commands::update::run(args, config, cancel_on_interrupt()).await
        }
        Commands::SelfUpdate(args) => {
            let config = load_config(config_dir, install_folder)?;
            commands::self_update::run(args, config, cancel_on_interrupt()).await
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout carries command output, including --json
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn config_loader(config_dir: Option<Utf8PathBuf>) -> Result<ConfigLoader> {
    match config_dir {
        Some(dir) => Ok(ConfigLoader::with_dir(dir)),
        None => ConfigLoader::new().context("Failed to locate the config directory"),
    }
}

/// Effective configuration: file, environment, then command-line overrides
fn load_config(
    config_dir: Option<Utf8PathBuf>,
    install_folder: Option<Utf8PathBuf>,
) -> Result<LauncherConfig> {
    let loader = config_loader(config_dir)?;
    let mut config = loader
        .load()
        .with_context(|| format!("Failed to load {}", loader.config_path()))?;

    if let Some(folder) = install_folder {
        config.settings.install_folder = folder.into_std_path_buf();
    }
    Ok(config)
}

/// Token cancelled on the first Ctrl-C; a second one exits immediately
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, cancelling...");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
    cancel
}
