//! Remote listing parsers
//!
//! Both the snapshot directory listing and the release page are plain HTML.
//! They are scanned line by line for a known anchor rather than parsed as
//! documents.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Latest artifact published remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Version token extracted from the listing
    pub version: String,

    /// File name of the artifact to download
    pub artifact_filename: String,
}

/// Find the latest snapshot archive in a directory listing.
///
/// Takes the first line whose left-trimmed text starts with
/// `<a href="<stem>`. The href value must end with `extension`. The version
/// is the href with `<stem>-` and the extension removed.
pub fn parse_snapshot_listing(
    body: &str,
    stem: &str,
    extension: &str,
) -> Result<ReleaseDescriptor> {
    let anchor = format!("<a href=\"{}", stem);
    let line = body
        .lines()
        .find(|line| line.trim_start().starts_with(&anchor))
        .ok_or_else(|| Error::parse(format!("no link to a {} archive in listing", stem)))?;

    let filename = quoted_value(line)
        .ok_or_else(|| Error::parse(format!("malformed anchor line: {}", line.trim())))?;
    ensure_plain_file_name(filename)?;

    let version = filename
        .strip_suffix(extension)
        .ok_or_else(|| {
            Error::parse(format!(
                "artifact {} does not end with {}",
                filename, extension
            ))
        })?
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|version| !version.is_empty())
        .ok_or_else(|| Error::parse(format!("artifact {} carries no version", filename)))?;

    Ok(ReleaseDescriptor {
        version: version.to_string(),
        artifact_filename: filename.to_string(),
    })
}

/// Find the latest tagged release on a release page.
///
/// Releases are assumed to be listed newest first, so the first line
/// containing `tag_anchor` names the latest release. The version is the text
/// following the anchor up to the closing quote; it may keep a leading `v`.
/// The artifact name is fixed per platform and passed in by the caller.
pub fn parse_release_listing(
    body: &str,
    tag_anchor: &str,
    artifact_filename: &str,
) -> Result<ReleaseDescriptor> {
    let (line, start) = body
        .lines()
        .find_map(|line| line.find(tag_anchor).map(|index| (line, index)))
        .ok_or_else(|| Error::parse("no release tag link in release page"))?;

    let rest = &line[start + tag_anchor.len()..];
    let end = rest
        .find('"')
        .ok_or_else(|| Error::parse(format!("unterminated release tag link: {}", line.trim())))?;
    let version = &rest[..end];
    if version.is_empty() {
        return Err(Error::parse("empty release tag"));
    }

    Ok(ReleaseDescriptor {
        version: version.to_string(),
        artifact_filename: artifact_filename.to_string(),
    })
}

/// Text between the first two double quotes of a line
fn quoted_value(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    let value = parts.next()?;
    // A closing quote must follow
    parts.next()?;
    Some(value)
}

/// The file name is joined onto local directories, so it may not carry a path
fn ensure_plain_file_name(filename: &str) -> Result<()> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(Error::parse(format!(
            "artifact name {} is not a plain file name",
            filename
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEM: &str = "forge-gui-desktop";
    const EXT: &str = ".tar.bz2";

    #[test]
    fn test_parse_snapshot_listing() {
        let body = r#"<html><body><pre>
<a href="../">../</a>
  <a href="forge-gui-desktop-1.6.53.CORE-SNAPSHOT.tar.bz2">forge-gui-desktop-1.6.53.CORE-SNAPSHOT.tar.bz2</a> 01-Jan-2023 10:00  210M
<a href="forge-gui-desktop-1.6.52.CORE-SNAPSHOT.tar.bz2">older</a>
</pre></body></html>"#;

        let release = parse_snapshot_listing(body, STEM, EXT).unwrap();
        assert_eq!(
            release.artifact_filename,
            "forge-gui-desktop-1.6.53.CORE-SNAPSHOT.tar.bz2"
        );
        assert_eq!(release.version, "1.6.53.CORE-SNAPSHOT");
    }

    #[test]
    fn test_parse_snapshot_listing_without_anchor() {
        let body = "<html><a href=\"something-else.tar.bz2\">x</a></html>";
        let err = parse_snapshot_listing(body, STEM, EXT).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_snapshot_listing_wrong_extension() {
        let body = "<a href=\"forge-gui-desktop-1.6.53.zip\">x</a>";
        assert!(parse_snapshot_listing(body, STEM, EXT).is_err());
    }

    #[test]
    fn test_parse_snapshot_listing_unterminated_quote() {
        let body = "<a href=\"forge-gui-desktop-1.6.53.tar.bz2";
        assert!(parse_snapshot_listing(body, STEM, EXT).is_err());
    }

    #[test]
    fn test_parse_snapshot_listing_rejects_paths() {
        let body = "<a href=\"forge-gui-desktop-1/../../evil.tar.bz2\">x</a>";
        assert!(parse_snapshot_listing(body, STEM, EXT).is_err());
    }

    #[test]
    fn test_parse_release_listing_takes_first_tag() {
        let anchor = "<a href=\"/SinaC/ForgeLauncher/releases/tag/";
        let body = r#"
<div>
  <a href="/SinaC/ForgeLauncher/releases/tag/v1.4.0" data-view-component="true">v1.4.0</a>
  <a href="/SinaC/ForgeLauncher/releases/tag/v1.3.2" data-view-component="true">v1.3.2</a>
</div>"#;

        let release = parse_release_listing(body, anchor, "launcher.tar.gz").unwrap();
        assert_eq!(release.version, "v1.4.0");
        assert_eq!(release.artifact_filename, "launcher.tar.gz");
    }

    #[test]
    fn test_parse_release_listing_without_tag() {
        let err = parse_release_listing("<html></html>", "tag/", "a.tar.gz").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
