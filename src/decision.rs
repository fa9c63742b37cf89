//! Update decision.
//!
//! Pure comparison of the stored timestamp against the remote release
//! timestamp. Both sides are UTC instants, so equivalent representations
//! with different offsets never cause a spurious install.

use chrono::{DateTime, Utc};

/// Outcome of comparing local and remote release timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Remote is newer than the local record, or no record exists.
    Install,
    /// Local record is at least as new as the remote release.
    UpToDate,
}

/// Decide whether an install should proceed.
pub fn decide(local: Option<DateTime<Utc>>, remote: DateTime<Utc>) -> Decision {
    match local {
        None => Decision::Install,
        Some(local) if remote > local => Decision::Install,
        Some(_) => Decision::UpToDate,
    }
}
