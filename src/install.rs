//! Asset download and archive install.
//!
//! Downloads the selected asset into a private staging directory, extracts
//! the zip into the target directory (overwriting existing files), and
//! elides a single wrapping top-level folder when the archive carries one.
//! The staging directory outlives the install so the caller can persist the
//! version record before the download is cleaned up.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{ResupplyError, Result};
use crate::ui::DownloadProgress;

/// Downloads release assets over HTTP.
pub struct Downloader {
    client: reqwest::blocking::Client,
    show_progress: bool,
}

impl Downloader {
    /// Create a downloader. Progress display is an explicit setting here
    /// rather than a process-wide toggle.
    pub fn new(show_progress: bool) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(concat!("resupply/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build HTTP client"),
            show_progress,
        }
    }

    /// Download `url` into `dir`, named after the asset so the file keeps
    /// its extension.
    pub fn download(&self, url: &str, asset_name: &str, dir: &Path) -> Result<PathBuf> {
        tracing::debug!("Downloading {} to {}", url, dir.display());

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ResupplyError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResupplyError::Download {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let progress =
            DownloadProgress::new(asset_name, response.content_length(), self.show_progress);

        let path = dir.join(asset_name);
        let mut file = File::create(&path).map_err(|e| ResupplyError::Download {
            url: url.to_string(),
            message: format!("failed to create {}: {}", path.display(), e),
        })?;

        let mut reader = progress.wrap_read(response);
        io::copy(&mut reader, &mut file).map_err(|e| ResupplyError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        progress.finish();

        Ok(path)
    }
}

/// Download the asset and install it into `target_dir`.
///
/// Returns the staging directory holding the downloaded archive; the caller
/// drops it (via [`cleanup_staging`]) after the version record is persisted.
pub fn fetch_and_install(
    downloader: &Downloader,
    url: &str,
    asset_name: &str,
    target_dir: &Path,
) -> Result<TempDir> {
    let staging = tempfile::Builder::new()
        .prefix("resupply-")
        .tempdir()
        .map_err(ResupplyError::Io)?;

    let archive = downloader.download(url, asset_name, staging.path())?;
    install_archive(&archive, target_dir)?;

    Ok(staging)
}

/// Best-effort removal of the download staging directory.
///
/// A failure here orphans the file in temp storage; it is logged and never
/// fails the run.
pub fn cleanup_staging(staging: TempDir) {
    if let Err(e) = staging.close() {
        tracing::warn!("Failed to remove temporary download: {}", e);
    }
}

/// Extract `archive` into `target_dir`, flattening a single wrapping
/// top-level folder.
///
/// Flattening is auto-detected from the archive listing: if every entry
/// lives under one top-level directory, its contents are moved up into the
/// target after extraction and the wrapper is removed. Archives with
/// multiple top-level entries are left as extracted. Detection from the
/// listing keeps the check independent of files already present in the
/// target from a previous install.
pub fn install_archive(archive: &Path, target_dir: &Path) -> Result<()> {
    let single_root = archive_single_root(archive)?;

    extract_archive(archive, target_dir)?;

    if let Some(root) = single_root {
        tracing::debug!("Flattening wrapper directory '{}'", root);
        flatten_root(target_dir, &root).map_err(|e| ResupplyError::Extraction {
            archive: archive.to_path_buf(),
            message: format!("failed to flatten '{}': {}", root, e),
        })?;
    }

    Ok(())
}

/// Name of the archive's single top-level directory, if it has one.
fn archive_single_root(archive_path: &Path) -> Result<Option<String>> {
    let file = File::open(archive_path).map_err(|e| extraction_error(archive_path, e))?;
    let archive = ZipArchive::new(file).map_err(|e| extraction_error(archive_path, e))?;

    let mut root: Option<String> = None;
    for name in archive.file_names() {
        let Some((first, _)) = name.split_once('/') else {
            // a top-level file rules out flattening
            return Ok(None);
        };
        match &root {
            None => root = Some(first.to_string()),
            Some(existing) if existing == first => {}
            Some(_) => return Ok(None),
        }
    }

    Ok(root)
}

/// Extract every entry of a zip archive into `target_dir`, overwriting
/// existing files.
fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).map_err(|e| extraction_error(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| extraction_error(archive_path, e))?;

    fs::create_dir_all(target_dir).map_err(|e| extraction_error(archive_path, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| extraction_error(archive_path, e))?;

        // Reject entries whose path would escape the target
        let Some(relative) = entry.enclosed_name() else {
            return Err(ResupplyError::Extraction {
                archive: archive_path.to_path_buf(),
                message: format!("entry '{}' escapes the target directory", entry.name()),
            });
        };
        let out_path = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| extraction_error(archive_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| extraction_error(archive_path, e))?;
        }

        let mut out = File::create(&out_path).map_err(|e| extraction_error(archive_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| extraction_error(archive_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| extraction_error(archive_path, e))?;
            }
        }
    }

    Ok(())
}

fn extraction_error(archive: &Path, err: impl std::fmt::Display) -> ResupplyError {
    ResupplyError::Extraction {
        archive: archive.to_path_buf(),
        message: err.to_string(),
    }
}

/// Move the contents of `target/{root}` up into `target` and remove the
/// wrapper.
///
/// The wrapper is renamed aside first so a payload entry sharing the
/// wrapper's name cannot collide with it mid-move.
fn flatten_root(target: &Path, root: &str) -> io::Result<()> {
    let wrapper = target.join(root);
    if !wrapper.is_dir() {
        return Ok(());
    }

    let staging = target.join(".resupply-flatten");
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::rename(&wrapper, &staging)?;

    for entry in fs::read_dir(&staging)? {
        let entry = entry?;
        merge_move(&entry.path(), &target.join(entry.file_name()))?;
    }

    fs::remove_dir(&staging)
}

/// Recursively move `src` to `dst`, merging into existing directories and
/// overwriting existing files.
fn merge_move(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() && dst.is_dir() {
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            merge_move(&entry.path(), &dst.join(entry.file_name()))?;
        }
        return fs::remove_dir(src);
    }

    if dst.exists() {
        if dst.is_dir() {
            fs::remove_dir_all(dst)?;
        } else {
            fs::remove_file(dst)?;
        }
    }
    fs::rename(src, dst)
}
