//! Release asset selection.
//!
//! Filters a release's asset list by a filename glob pattern (`*`, `?`,
//! `[...]` character classes). Selection among multiple matches is
//! deterministic: the first match in API order wins.

use anyhow::Context;
use glob::Pattern;

use crate::error::{ResupplyError, Result};
use crate::github::ReleaseAsset;

/// Select the asset matching `pattern` from a release's asset list.
///
/// Returns the first match in API order. Zero matches is a fatal
/// [`ResupplyError::AssetNotFound`]; extra matches are logged and ignored.
pub fn select_asset<'a>(assets: &'a [ReleaseAsset], pattern: &str) -> Result<&'a ReleaseAsset> {
    let matcher = Pattern::new(pattern)
        .with_context(|| format!("invalid asset pattern '{}'", pattern))?;

    let mut matches = assets.iter().filter(|a| matcher.matches(&a.name));

    let selected = matches.next().ok_or_else(|| ResupplyError::AssetNotFound {
        pattern: pattern.to_string(),
    })?;

    let ignored: Vec<&str> = matches.map(|a| a.name.as_str()).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            "Pattern '{}' matches {} assets; using '{}', ignoring {}",
            pattern,
            ignored.len() + 1,
            selected.name,
            ignored.join(", ")
        );
    }

    Ok(selected)
}
