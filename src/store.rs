//! Persistent version records.
//!
//! One small YAML file per project name, holding the timestamp of the
//! release currently installed for that project. The record is written only
//! after a fully successful extraction, so it never points at a
//! partially-installed state under normal termination.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ResupplyError, Result};

/// Persisted record for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Project key the record belongs to.
    pub name: String,

    /// Publish timestamp of the installed release.
    pub created_at: DateTime<Utc>,
}

/// File-per-project store of installed release timestamps.
#[derive(Debug, Clone)]
pub struct VersionStore {
    dir: PathBuf,
}

impl VersionStore {
    /// Create a store rooted at `dir`. Nothing is created until the first
    /// [`save`](Self::save).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default store location under the user's local data directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resupply")
            .join("versions")
    }

    /// Get the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for a project.
    pub fn record_file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.yml", name))
    }

    /// Load the installed-release timestamp for a project.
    ///
    /// A missing file means "no previous version" and returns `Ok(None)`.
    /// A file that exists but cannot be read or parsed is a fatal
    /// [`ResupplyError::Persistence`] — storage corruption must not be
    /// mistaken for a fresh install.
    pub fn load(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.record_file(validate_name(name)?);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| ResupplyError::Persistence {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let record: VersionRecord =
            serde_yaml::from_str(&content).map_err(|e| ResupplyError::Persistence {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(Some(record.created_at))
    }

    /// Overwrite the record for a project using an atomic write.
    ///
    /// Uses the write-to-temp-then-rename pattern so a crash mid-write never
    /// leaves a truncated record behind. The store directory is created on
    /// first use.
    pub fn save(&self, name: &str, created_at: DateTime<Utc>) -> Result<()> {
        let name = validate_name(name)?;

        fs::create_dir_all(&self.dir).map_err(|e| ResupplyError::Persistence {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;

        let record = VersionRecord {
            name: name.to_string(),
            created_at,
        };
        let content = serde_yaml::to_string(&record).map_err(|e| ResupplyError::Persistence {
            path: self.record_file(name),
            message: format!("failed to serialize record: {}", e),
        })?;

        let path = self.record_file(name);
        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, &content).map_err(|e| ResupplyError::Persistence {
            path: temp_path.clone(),
            message: e.to_string(),
        })?;
        fs::rename(&temp_path, &path).map_err(|e| ResupplyError::Persistence {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Recorded {} for {} in {}", created_at, name, path.display());
        Ok(())
    }
}

/// Reject project names that would escape the store directory.
fn validate_name(name: &str) -> Result<&str> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(ResupplyError::Persistence {
            path: PathBuf::from(name),
            message: "project name must be a plain name without path separators".to_string(),
        });
    }
    Ok(name)
}
