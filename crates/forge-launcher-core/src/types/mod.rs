//! Configuration types

mod launcher_config;

pub use launcher_config::*;
