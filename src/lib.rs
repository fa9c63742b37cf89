//! Resupply - keeps deployed GitHub release artifacts up to date.
//!
//! Resupply checks a GitHub repository's releases for a build newer than the
//! one installed locally and, if found, downloads and extracts it into a
//! target directory, optionally stopping and restarting a dependent service
//! around the file replacement. One invocation is one check; an external
//! scheduler drives repeated runs.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`github`] - Releases API client
//! - [`assets`] - Release asset selection by glob pattern
//! - [`decision`] - Install-or-skip comparison of release timestamps
//! - [`store`] - Persisted per-project version records
//! - [`service`] - Service stop/start around installs
//! - [`install`] - Asset download and archive extraction
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Terminal output and download progress

pub mod assets;
pub mod cli;
pub mod decision;
pub mod error;
pub mod github;
pub mod install;
pub mod service;
pub mod store;
pub mod ui;

pub use error::{ResupplyError, Result};
