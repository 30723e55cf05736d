//! Config command

use anyhow::{Context, Result};
use forge_launcher_core::{ConfigLoader, SETTING_KEYS};

use crate::cli::{ConfigCommands, ConfigSetArgs, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, loader: &ConfigLoader) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, loader),
        ConfigCommands::Set(args) => set(args, loader),
        ConfigCommands::Path => {
            println!("{}", loader.config_path());
            Ok(())
        }
    }
}

fn show(args: ConfigShowArgs, loader: &ConfigLoader) -> Result<()> {
    let config = loader
        .load()
        .with_context(|| format!("Failed to load {}", loader.config_path()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(&config)?);
    }
    Ok(())
}

fn set(args: ConfigSetArgs, loader: &ConfigLoader) -> Result<()> {
    // Environment overrides must not end up in the file
    let mut config = loader
        .load_persisted()
        .with_context(|| format!("Failed to load {}", loader.config_path()))?;

    config
        .settings
        .set(&args.key, &args.value)
        .with_context(|| format!("Valid settings: {}", SETTING_KEYS.join(", ")))?;
    loader
        .save(&config)
        .with_context(|| format!("Failed to write {}", loader.config_path()))?;

    let value = config.settings.get(&args.key).unwrap_or(args.value);
    output::success(&format!("Set {} = {}", args.key, value));
    Ok(())
}
