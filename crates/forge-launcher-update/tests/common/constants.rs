//! Shared constants for test infrastructure

pub const ARTIFACT_STEM: &str = "forge-gui-desktop";
pub const ARCHIVE_EXTENSION: &str = ".tar.bz2";

// Snapshot versions as published in the listing
pub const SNAPSHOT_1_6_52: &str = "1.6.52.CORE-SNAPSHOT";
pub const SNAPSHOT_1_6_53: &str = "1.6.53.CORE-SNAPSHOT";

// Release tags
pub const LAUNCHER_VERSION: &str = "1.0.0";
pub const TAG_V1_1_0: &str = "v1.1.0";
pub const TAG_V1_0_0: &str = "v1.0.0";

// Server paths
pub const LISTING_PATH: &str = "/dailysnapshots/";
pub const RELEASES_PATH: &str = "/SinaC/ForgeLauncher/releases";
pub const RELEASE_TAG_ANCHOR: &str = "<a href=\"/SinaC/ForgeLauncher/releases/tag/";
pub const RELEASE_ARTIFACT: &str = "forge-launcher-test.tar.gz";

// Installed files
pub const EXECUTABLE_NAME: &str = "forge.sh";
pub const EXECUTABLE_CONTENT: &[u8] = b"#!/bin/sh\nexit 0\n";
pub const MARKER_FILE_NAME: &str = "forge-launcher.last-version";

pub const FAKE_ARCHIVE_CONTENT: &[u8] = b"this is not a tarball";

/// Archive file name published for a snapshot version
pub fn snapshot_filename(version: &str) -> String {
    format!("{}-{}{}", ARTIFACT_STEM, version, ARCHIVE_EXTENSION)
}
