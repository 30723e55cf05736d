//! Common test infrastructure for forge-launcher-update tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: version strings, artifact names, listing paths
//! - `builders`: tarball and listing page builders
//! - `mock_server`: wiremock setup helpers for listings and archives
//! - `recorders`: observer and launcher doubles that record calls

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod mock_server;
pub mod recorders;

pub use builders::*;
pub use constants::*;
pub use mock_server::*;
pub use recorders::*;
