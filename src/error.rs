//! Error types for resupply operations.
//!
//! This module defines [`ResupplyError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ResupplyError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `ResupplyError::Other`) for unexpected errors
//! - Every variant is terminal for the run: nothing is retried, and the
//!   process exits non-zero after reporting it

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for resupply operations.
#[derive(Debug, Error)]
pub enum ResupplyError {
    /// Release metadata could not be fetched (transport failure, non-success
    /// status, or an unusable response body).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The asset pattern matched nothing in the release.
    #[error("No release asset matches '{pattern}'")]
    AssetNotFound { pattern: String },

    /// Transport failure while fetching the release binary itself.
    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// Corrupt archive or filesystem failure during extraction.
    #[error("Extraction failed for {archive}: {message}")]
    Extraction { archive: PathBuf, message: String },

    /// A managed service is missing or refused a stop/start request.
    #[error("Service control failed for '{service}': {message}")]
    ServiceControl { service: String, message: String },

    /// Version record could not be read or written.
    #[error("Version record error at {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for resupply operations.
pub type Result<T> = std::result::Result<T, ResupplyError>;
