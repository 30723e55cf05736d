//! Version information for the launcher and the Forge install it manages

use forge_launcher_core::LauncherConfig;
use forge_launcher_update::{SnapshotChannel, VersionSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Launcher version
    pub version: String,

    /// Short commit the launcher was built from
    pub commit: Option<String>,

    /// Build date (UTC)
    pub build_date: Option<String>,

    /// Target triple
    pub target: Option<String>,

    /// Managed Forge install, when the configuration could be loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forge: Option<ForgeInstall>,
}

/// Forge install as recorded by the marker file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeInstall {
    pub install_folder: PathBuf,

    /// `None` when Forge is not installed
    pub version: Option<String>,
}

impl ForgeInstall {
    pub fn detect(config: &LauncherConfig) -> Self {
        let local = SnapshotChannel::from_settings(&config.settings).local();
        Self {
            install_folder: local.install_path,
            version: local.version,
        }
    }
}

impl VersionInfo {
    /// Launcher build info, without the Forge install
    pub fn current() -> Self {
        Self {
            version: forge_launcher_update::VERSION.to_string(),
            commit: option_env!("FORGE_LAUNCHER_GIT_SHA").map(String::from),
            build_date: option_env!("FORGE_LAUNCHER_BUILD_DATE").map(String::from),
            target: option_env!("FORGE_LAUNCHER_TARGET").map(String::from),
            forge: None,
        }
    }

    pub fn with_forge(mut self, forge: ForgeInstall) -> Self {
        self.forge = Some(forge);
        self
    }

    /// One-line summary, e.g.
    /// `forge-launcher 0.1.0 (abc1234) x86_64-unknown-linux-gnu, Forge 1.6.53.CORE-SNAPSHOT`
    pub fn display(&self) -> String {
        let mut line = format!("forge-launcher {}", self.version);
        if let Some(commit) = &self.commit {
            line.push_str(&format!(" ({})", commit));
        }
        if let Some(target) = &self.target {
            line.push(' ');
            line.push_str(target);
        }

        match self.forge.as_ref().map(|forge| forge.version.as_deref()) {
            Some(Some(version)) => line.push_str(&format!(", Forge {}", version)),
            Some(None) => line.push_str(", Forge not installed"),
            None => {}
        }
        line
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
