//! Version comparison
//!
//! Versions are compared as dotted numeric strings. Qualifiers such as
//! `-SNAPSHOT-<timestamp>` or `.CORE-SNAPSHOT` are split off by the outdated
//! checks before the numeric parts reach [`compare_versions`].

use crate::error::{Error, Result};
use std::cmp::Ordering;
use tracing::warn;

/// Separator between the release part and the build timestamp of a snapshot
pub const SNAPSHOT_SEPARATOR: &str = "-SNAPSHOT-";

/// Number of components kept from a release version
const RELEASE_COMPONENTS: usize = 3;

/// Compare two dotted numeric versions segment by segment.
///
/// Missing trailing segments and empty segments count as zero, so `"1.2"`
/// equals `"1.2.0"`. A non-numeric segment is an error rather than being
/// ordered arbitrarily.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let left = parse_segments(a)?;
    let right = parse_segments(b)?;

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }

    Ok(Ordering::Equal)
}

fn parse_segments(version: &str) -> Result<Vec<u64>> {
    version
        .trim()
        .split('.')
        .map(|segment| {
            if segment.is_empty() {
                return Ok(0);
            }
            segment.parse::<u64>().map_err(|_| {
                Error::invalid_version(version, format!("segment '{}' is not numeric", segment))
            })
        })
        .collect()
}

fn split_snapshot(version: &str) -> (&str, &str) {
    version
        .split_once(SNAPSHOT_SEPARATOR)
        .unwrap_or((version, ""))
}

/// Leading numeric dotted segments, e.g. `1.6.54` from `1.6.54.CORE-SNAPSHOT`
/// or `1.6.54-SNAPSHOT`
fn numeric_prefix(version: &str) -> &str {
    let version = version.trim();
    let mut end = 0;
    let mut offset = 0;
    for segment in version.split('.') {
        let digits = segment.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            break;
        }
        end = offset + digits;
        if digits < segment.len() {
            break;
        }
        offset += segment.len() + 1;
    }
    &version[..end]
}

/// Whether the installed snapshot `local` is older than `remote`.
///
/// Decision order:
/// 1. compare the numeric prefixes of the parts before `-SNAPSHOT-`
///    (`1.6.53` for `1.6.53.CORE-SNAPSHOT`); a difference decides
/// 2. if both sides carry a timestamp, compare the timestamps
/// 3. otherwise `local` is current only if `remote` contains it verbatim
///
/// A side without a numeric prefix goes straight to step 3.
pub fn is_snapshot_outdated(local: &str, remote: &str) -> bool {
    match compare_snapshots(local, remote) {
        Ok(Some(outdated)) => outdated,
        Ok(None) => !remote.contains(local),
        Err(e) => {
            warn!("{}; falling back to containment check", e);
            !remote.contains(local)
        }
    }
}

fn compare_snapshots(local: &str, remote: &str) -> Result<Option<bool>> {
    let (local_major, local_minor) = split_snapshot(local);
    let (remote_major, remote_minor) = split_snapshot(remote);
    let local_major = numeric_prefix(local_major);
    let remote_major = numeric_prefix(remote_major);
    if local_major.is_empty() || remote_major.is_empty() {
        return Ok(None);
    }

    match compare_versions(local_major, remote_major)? {
        Ordering::Less => return Ok(Some(true)),
        Ordering::Greater => return Ok(Some(false)),
        Ordering::Equal => {}
    }

    if !local_minor.is_empty() && !remote_minor.is_empty() {
        let ordering = compare_versions(local_minor, remote_minor)?;
        return Ok(Some(ordering == Ordering::Less));
    }

    Ok(None)
}

/// Whether the running launcher version `local` is older than the tagged
/// release `remote`.
///
/// A leading `v` is ignored on both sides and a local build component
/// beyond `major.minor.patch` is dropped before comparing.
pub fn is_release_outdated(local: &str, remote: &str) -> Result<bool> {
    let local = truncate_components(strip_tag_prefix(local.trim()), RELEASE_COMPONENTS);
    let remote = strip_tag_prefix(remote.trim());
    Ok(compare_versions(local, remote)? == Ordering::Less)
}

/// Strip a leading `v` from a release tag
pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

fn truncate_components(version: &str, keep: usize) -> &str {
    match version.match_indices('.').nth(keep - 1) {
        Some((index, _)) => &version[..index],
        None => version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_pads_missing_segments() {
        assert_eq!(compare_versions("1.2.0", "1.2").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("1.2", "1.2.0.0").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_is_numeric_not_lexical() {
        assert_eq!(compare_versions("1.9.0", "1.10.0").unwrap(), Ordering::Less);
        assert_eq!(compare_versions("2.0.0", "1.9.9").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1.2.10", "1.2.9").unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_compare_treats_empty_segment_as_zero() {
        assert_eq!(compare_versions("1..3", "1.0.3").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_rejects_non_numeric_segments() {
        let err = compare_versions("1.6.53.CORE", "1.6.53").unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }));
        assert!(compare_versions("1.2.3", "1.2.x").is_err());
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        let pairs = [("1.2.3", "1.2.4"), ("3.0", "2.99.99"), ("0.1", "0.1.0")];
        for (a, b) in pairs {
            let forward = compare_versions(a, b).unwrap();
            let backward = compare_versions(b, a).unwrap();
            assert_eq!(forward, backward.reverse(), "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_snapshot_outdated_plain_versions() {
        assert!(is_snapshot_outdated("1.2.3", "1.2.4"));
        assert!(!is_snapshot_outdated("1.2.4", "1.2.3"));
        assert!(!is_snapshot_outdated("1.2.3", "1.2.3"));
    }

    #[test]
    fn test_snapshot_outdated_with_timestamps() {
        assert!(is_snapshot_outdated(
            "1.6.53-SNAPSHOT-20230101",
            "1.6.54-SNAPSHOT-20230102"
        ));
        assert!(is_snapshot_outdated(
            "1.6.53-SNAPSHOT-20230101",
            "1.6.53-SNAPSHOT-20230102"
        ));
        assert!(!is_snapshot_outdated(
            "1.6.53-SNAPSHOT-20230102",
            "1.6.53-SNAPSHOT-20230101"
        ));
    }

    #[test]
    fn test_snapshot_outdated_falls_back_to_containment() {
        // One side without a timestamp
        assert!(!is_snapshot_outdated("1.6.53", "1.6.53-SNAPSHOT-20230101"));
        assert!(!is_snapshot_outdated(
            "1.6.53.CORE-SNAPSHOT",
            "1.6.53.CORE-SNAPSHOT"
        ));
        // Same numeric prefix, different qualifier
        assert!(is_snapshot_outdated("1.6.53.CORE-SNAPSHOT", "1.6.53.GUI-SNAPSHOT"));
        // No numeric prefix at all
        assert!(!is_snapshot_outdated("nightly", "forge-nightly"));
        assert!(is_snapshot_outdated("nightly", "latest"));
    }

    #[test]
    fn test_snapshot_outdated_orders_qualified_versions_numerically() {
        assert!(is_snapshot_outdated(
            "1.6.53.CORE-SNAPSHOT",
            "1.6.54.CORE-SNAPSHOT"
        ));
        // A newer local install is never offered a downgrade
        assert!(!is_snapshot_outdated(
            "1.6.54.CORE-SNAPSHOT",
            "1.6.53.CORE-SNAPSHOT"
        ));
        assert!(!is_snapshot_outdated(
            "1.6.100.CORE-SNAPSHOT",
            "1.6.99.CORE-SNAPSHOT"
        ));
        assert!(!is_snapshot_outdated("1.6.54-SNAPSHOT", "1.6.53-SNAPSHOT"));
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("1.6.54.CORE-SNAPSHOT"), "1.6.54");
        assert_eq!(numeric_prefix("1.2.3"), "1.2.3");
        assert_eq!(numeric_prefix(" 1.2 "), "1.2");
        assert_eq!(numeric_prefix("1.6.53-rc1"), "1.6.53");
        assert_eq!(numeric_prefix("1.6.54-SNAPSHOT"), "1.6.54");
        assert_eq!(numeric_prefix("1.6.x"), "1.6");
        assert_eq!(numeric_prefix("CORE"), "");
        assert_eq!(numeric_prefix(""), "");
    }

    #[test]
    fn test_release_outdated() {
        assert!(is_release_outdated("1.2.3", "v1.2.4").unwrap());
        assert!(!is_release_outdated("1.2.4", "v1.2.3").unwrap());
        assert!(!is_release_outdated("1.2.3", "1.2.3").unwrap());
    }

    #[test]
    fn test_release_outdated_drops_build_component() {
        assert!(!is_release_outdated("1.2.3.7", "v1.2.3").unwrap());
        assert!(is_release_outdated("v1.2.3.7", "v1.2.4").unwrap());
    }

    #[test]
    fn test_release_outdated_propagates_invalid_version() {
        assert!(is_release_outdated("1.2.3", "latest").is_err());
    }

    #[test]
    fn test_truncate_components() {
        assert_eq!(truncate_components("1.2.3.4.5", 3), "1.2.3");
        assert_eq!(truncate_components("1.2", 3), "1.2");
    }
}
