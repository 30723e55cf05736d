//! Embeds build metadata shown by `forge-launcher version`
//!
//! `SOURCE_DATE_EPOCH` pins the build date for reproducible builds, and
//! `FORGE_LAUNCHER_GIT_SHA` supplies the commit when building outside a
//! git checkout (e.g. from a release tarball).

use chrono::{DateTime, Utc};

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=FORGE_LAUNCHER_GIT_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!(
        "cargo:rustc-env=FORGE_LAUNCHER_BUILD_DATE={}",
        build_date().format("%Y-%m-%d")
    );

    // Only visible to build scripts
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=FORGE_LAUNCHER_TARGET={}", target);
    }

    if let Some(sha) = commit_sha() {
        println!("cargo:rustc-env=FORGE_LAUNCHER_GIT_SHA={}", sha);
    }
}

fn build_date() -> DateTime<Utc> {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|epoch| epoch.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

fn commit_sha() -> Option<String> {
    if let Ok(sha) = std::env::var("FORGE_LAUNCHER_GIT_SHA") {
        let sha = sha.trim();
        if !sha.is_empty() {
            return Some(sha.chars().take(7).collect());
        }
    }

    let output = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|sha| !sha.is_empty())
}
