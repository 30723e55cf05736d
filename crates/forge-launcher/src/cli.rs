//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Forge Launcher - keeps Forge up to date and starts it
#[derive(Parser, Debug)]
#[command(name = "forge-launcher")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding config.yaml [default: ~/.forge-launcher]
    #[arg(long, global = true, env = "FORGE_LAUNCHER_CONFIG_DIR")]
    pub config_dir: Option<Utf8PathBuf>,

    /// Forge install folder for this run, overriding the configured one
    #[arg(long, global = true)]
    pub install_folder: Option<Utf8PathBuf>,

    /// Arguments for the default `launch` command
    #[command(flatten)]
    pub launch: LaunchArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install or update Forge if needed, then launch it (default)
    Launch(LaunchArgs),

    /// Compare the installed and published Forge versions
    Check(CheckArgs),

    /// Download and install the latest Forge snapshot without launching
    Update(UpdateArgs),

    /// Check for a newer launcher release and stage it
    SelfUpdate(SelfUpdateArgs),

    /// Launcher settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    Version(VersionArgs),
}

// Launch command
#[derive(Args, Debug, Default, Clone)]
pub struct LaunchArgs {
    /// Install or update without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Stop after installing or updating
    #[arg(long)]
    pub no_launch: bool,
}

// Check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Reinstall even when already up to date
    #[arg(short, long)]
    pub force: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Self-update command
#[derive(Args, Debug)]
pub struct SelfUpdateArgs {
    /// Only check for a newer release
    #[arg(long)]
    pub check: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show(ConfigShowArgs),

    /// Change a launcher setting
    Set(ConfigSetArgs),

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Setting name, e.g. install-folder or close-on-launch
    pub key: String,

    /// New value
    pub value: String,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
