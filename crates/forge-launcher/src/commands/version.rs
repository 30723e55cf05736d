//! Version command

use crate::cli::VersionArgs;
use crate::version::{ForgeInstall, VersionInfo};
use anyhow::Result;
use forge_launcher_core::LauncherConfig;

/// `config` is `None` when it could not be loaded; the launcher's own
/// version is still reported.
pub fn run(args: VersionArgs, config: Option<&LauncherConfig>) -> Result<()> {
    let mut info = VersionInfo::current();
    if let Some(config) = config {
        info = info.with_forge(ForgeInstall::detect(config));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.display());

        if let Some(date) = &info.build_date {
            println!("Build date: {}", date);
        }
        if let Some(forge) = &info.forge {
            println!("Forge folder: {}", forge.install_folder.display());
        }
    }

    Ok(())
}
