//! Archive extraction
//!
//! Snapshot archives are bzip2-compressed tarballs and launcher releases are
//! gzip-compressed. Entries are written one by one so that names can be
//! checked before anything touches the disk:
//! - directory entries are skipped (parents are created on demand)
//! - names containing control bytes have those bytes replaced with `_` and
//!   are written flat into the destination root
//! - absolute paths and `..` components are rejected

use crate::error::{Error, Result};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Supported archive containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarBz2,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the archive file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
            Some(Self::TarBz2)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }
}

/// Counts collected while extracting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Files written to the destination
    pub files_written: usize,

    /// Files whose names were sanitized and flattened
    pub sanitized: usize,

    /// Directory, link and other non-file entries skipped
    pub skipped: usize,
}

/// Extracts compressed tarballs into a destination directory
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive_path` into `destination`, overwriting existing files.
    ///
    /// Blocking; run it on a blocking thread from async code. `cancel` is
    /// checked between entries.
    pub fn extract(
        &self,
        archive_path: &Path,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<ExtractionSummary> {
        let format = ArchiveFormat::from_path(archive_path)
            .ok_or_else(|| Error::extraction(archive_path, "unsupported archive format"))?;
        let file = File::open(archive_path)
            .map_err(|e| Error::extraction(archive_path, e.to_string()))?;
        fs::create_dir_all(destination)
            .map_err(|e| Error::extraction(archive_path, e.to_string()))?;

        debug!(
            "Extracting {} ({:?}) into {}",
            archive_path.display(),
            format,
            destination.display()
        );

        let reader = BufReader::new(file);
        match format {
            ArchiveFormat::TarBz2 => unpack(
                Archive::new(BzDecoder::new(reader)),
                archive_path,
                destination,
                cancel,
            ),
            ArchiveFormat::TarGz => unpack(
                Archive::new(GzDecoder::new(reader)),
                archive_path,
                destination,
                cancel,
            ),
        }
    }
}

fn unpack<R: Read>(
    mut archive: Archive<R>,
    archive_path: &Path,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<ExtractionSummary> {
    let extraction_error = |e: io::Error| Error::extraction(archive_path, e.to_string());
    let mut summary = ExtractionSummary::default();

    for entry in archive.entries().map_err(extraction_error)? {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut entry = entry.map_err(extraction_error)?;
        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            summary.skipped += 1;
            continue;
        }
        if !(entry_type.is_file() || entry_type == tar::EntryType::Continuous) {
            debug!("Skipping {:?} entry", entry_type);
            summary.skipped += 1;
            continue;
        }

        let raw_name = entry.path_bytes().into_owned();
        let target = if raw_name.iter().any(|b| *b < 32) {
            let flat = flat_sanitized_name(&raw_name).ok_or_else(|| {
                Error::extraction(archive_path, "entry name is empty after sanitizing")
            })?;
            warn!(
                "Entry {:?} contains control characters, writing it as {}",
                String::from_utf8_lossy(&raw_name),
                flat
            );
            summary.sanitized += 1;
            destination.join(flat)
        } else {
            let path = entry.path().map_err(extraction_error)?;
            destination.join(safe_relative_path(&path).map_err(|message| {
                Error::extraction(archive_path, message)
            })?)
        };

        write_entry(&mut entry, &target).map_err(extraction_error)?;
        summary.files_written += 1;
    }

    debug!(
        "Extracted {} files ({} sanitized, {} skipped)",
        summary.files_written, summary.sanitized, summary.skipped
    );
    Ok(summary)
}

/// Replace control bytes with `_` and keep only the final path component
fn flat_sanitized_name(raw: &[u8]) -> Option<String> {
    let sanitized: Vec<u8> = raw
        .iter()
        .map(|b| if *b < 32 { b'_' } else { *b })
        .collect();
    let sanitized = String::from_utf8_lossy(&sanitized);
    sanitized
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .map(String::from)
}

/// Relative path of an entry, rejecting anything that could escape the
/// destination
fn safe_relative_path(path: &Path) -> std::result::Result<PathBuf, String> {
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(format!("unsafe entry path {}", path.display()));
            }
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(format!("empty entry path {:?}", path));
    }
    Ok(relative)
}

fn write_entry<R: Read>(entry: &mut tar::Entry<'_, R>, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mode = entry
        .header()
        .mode()
        .ok()
        .map(|mode| mode & 0o777)
        .filter(|mode| *mode != 0);

    let mut out = File::create(target)?;
    io::copy(entry, &mut out)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode {
            fs::set_permissions(target, fs::Permissions::from_mode(mode))?;
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ArchiveFormat::from_path(Path::new("forge-gui-desktop-1.6.53.tar.bz2")),
            Some(ArchiveFormat::TarBz2)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("launcher.TGZ")),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(ArchiveFormat::from_path(Path::new("launcher.zip")), None);
    }

    #[test]
    fn test_flat_sanitized_name() {
        assert_eq!(
            flat_sanitized_name(b"nested/bad\0name.txt").as_deref(),
            Some("bad_name.txt")
        );
        assert_eq!(
            flat_sanitized_name(b"tab\there").as_deref(),
            Some("tab_here")
        );
        assert_eq!(flat_sanitized_name(b"../\x01/").as_deref(), Some("_"));
        assert_eq!(flat_sanitized_name(b"../"), None);
    }

    #[test]
    fn test_safe_relative_path() {
        assert_eq!(
            safe_relative_path(Path::new("./res/cardsfolder/a.txt")).unwrap(),
            PathBuf::from("res/cardsfolder/a.txt")
        );
        assert!(safe_relative_path(Path::new("../escape.txt")).is_err());
        assert!(safe_relative_path(Path::new("res/../../escape.txt")).is_err());
        assert!(safe_relative_path(Path::new("/etc/passwd")).is_err());
        assert!(safe_relative_path(Path::new("./")).is_err());
    }
}
