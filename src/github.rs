//! GitHub releases API client.
//!
//! Fetches release metadata for a repository, either the latest stable
//! release or the newest release including pre-releases. Only the fields
//! consumed downstream are deserialized.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ResupplyError, Result};

/// Default API base, overridable for tests.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// A repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("expected OWNER/NAME, got '{}'", s)),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// GitHub release metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub prerelease: bool,
    pub assets: Vec<ReleaseAsset>,
}

/// GitHub release asset.
///
/// `created_at` carries whatever offset the API sent; chrono normalizes it
/// to a UTC instant at deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub browser_download_url: String,
}

/// Blocking client for the releases API.
pub struct ReleaseClient {
    client: reqwest::blocking::Client,
    api_base: String,
}

impl ReleaseClient {
    /// Create a client against the public GitHub API.
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create a client against a custom API base URL.
    pub fn with_api_base(api_base: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(concat!("resupply/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Get the configured API base.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Resolve the release to install for a repository.
    ///
    /// Stable mode queries the `releases/latest` endpoint. Pre-release mode
    /// fetches the full list (newest first per the API) and takes the first
    /// entry; an empty list is a [`ResupplyError::Network`] failure.
    pub fn resolve(&self, repo: &RepoRef, include_prerelease: bool) -> Result<Release> {
        if include_prerelease {
            let url = format!("{}/repos/{}/{}/releases", self.api_base, repo.owner, repo.name);
            tracing::debug!("Fetching release list from {}", url);
            let releases: Vec<Release> = self.get_json(&url)?;
            releases
                .into_iter()
                .next()
                .ok_or_else(|| ResupplyError::Network {
                    message: format!("no releases published for {}", repo),
                })
        } else {
            let url = format!(
                "{}/repos/{}/{}/releases/latest",
                self.api_base, repo.owner, repo.name
            );
            tracing::debug!("Fetching latest release from {}", url);
            self.get_json(&url)
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| ResupplyError::Network {
                message: format!("request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResupplyError::Network {
                message: format!("HTTP {} fetching {}", status, url),
            });
        }

        let body = response.text().map_err(|e| ResupplyError::Network {
            message: format!("failed to read response from {}: {}", url, e),
        })?;

        serde_json::from_str(&body).map_err(|e| ResupplyError::Network {
            message: format!("unexpected response from {}: {}", url, e),
        })
    }
}

impl Default for ReleaseClient {
    fn default() -> Self {
        Self::new()
    }
}
