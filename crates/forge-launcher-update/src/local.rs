//! Local installation detection
//!
//! The installed version is read from a one-line marker file written after
//! every successful install. Installs that predate the marker are detected
//! by scanning the install folder for the application jar.

use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix of the application jar shipped in snapshot archives
const JAR_SUFFIX: &str = "-SNAPSHOT-jar-with-dependencies";

/// What is currently installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalInstallation {
    /// Installed version, `None` when nothing is installed
    pub version: Option<String>,

    /// Folder the installation lives in
    pub install_path: PathBuf,
}

/// One-line file holding the last installed version
#[derive(Debug, Clone)]
pub struct MarkerFile {
    path: PathBuf,
}

impl MarkerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded version. A missing or blank file yields `None`.
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .next()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the marker with `version`.
    ///
    /// The write is not atomic; an interrupted write leaves a truncated file
    /// which reads back as no marker.
    pub fn write(&self, version: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", version))?;
        Ok(())
    }
}

/// Resolve the installed version of the application in `install_dir`.
///
/// The marker file takes precedence. If it is absent, blank or unreadable,
/// the folder is scanned for `<stem>-*-SNAPSHOT-jar-with-dependencies.jar`.
pub fn resolve_local(
    install_dir: &Path,
    marker: &MarkerFile,
    stem: &str,
) -> LocalInstallation {
    let version = match marker.read() {
        Ok(Some(version)) => {
            debug!("Version {} read from {}", version, marker.path().display());
            Some(version)
        }
        Ok(None) => scan_installed_version(install_dir, stem),
        Err(e) => {
            warn!(
                "Could not read version marker {}: {}",
                marker.path().display(),
                e
            );
            scan_installed_version(install_dir, stem)
        }
    };

    LocalInstallation {
        version,
        install_path: install_dir.to_path_buf(),
    }
}

/// Scan `install_dir` for installed application jars and return the
/// greatest embedded version.
///
/// Versions are ranked by plain string ordering, so `1.10` sorts below `1.9`.
pub fn scan_installed_version(install_dir: &Path, stem: &str) -> Option<String> {
    let Some(dir) = install_dir.to_str() else {
        warn!(
            "Install folder {} is not valid UTF-8, skipping scan",
            install_dir.display()
        );
        return None;
    };

    let pattern = format!(
        "{}/{}-*{}.jar",
        glob::Pattern::escape(dir),
        glob::Pattern::escape(stem),
        JAR_SUFFIX
    );
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid scan pattern {}: {}", pattern, e);
            return None;
        }
    };

    let prefix = format!("{}-", stem);
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            let file_stem = path.file_stem()?.to_str()?;
            let version = file_stem.strip_prefix(&prefix)?.strip_suffix(JAR_SUFFIX)?;
            (!version.is_empty()).then(|| version.to_string())
        })
        .max()
}
