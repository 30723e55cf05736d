//! CLI command implementations

pub mod check;
pub mod config;
pub mod launch;
pub mod self_update;
pub mod update;
pub mod version;
