//! Terminal output.
//!
//! User-facing lines go through [`Output`]; diagnostics go through
//! `tracing`. Download progress is rendered with an indicatif bar that the
//! quiet mode hides.

pub mod output;
pub mod progress;

pub use output::{Output, OutputMode};
pub use progress::DownloadProgress;
