//! Payload types returned by a [`RepoSource`](crate::RepoSource).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use repometa_core::RepoKey;

/// One repository as listed by `GET /orgs/{org}/repos`.
///
/// Carries every basic field, so refreshing those costs no extra request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoHandle {
    pub full_name: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub license: Option<LicenseInfo>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RepoHandle {
    /// A bare handle for `owner/name`; everything else empty.
    pub fn new(full_name: &str) -> Self {
        let name = full_name
            .rsplit_once('/')
            .map(|(_, n)| n)
            .unwrap_or(full_name)
            .to_owned();
        Self {
            full_name: full_name.to_owned(),
            name,
            description: None,
            homepage: None,
            stargazers_count: 0,
            forks_count: 0,
            license: None,
            language: None,
            archived: false,
            created_at: None,
        }
    }

    pub fn key(&self) -> RepoKey {
        RepoKey::from(self.full_name.as_str())
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}", self.full_name)
    }

    pub fn spdx_id(&self) -> Option<&str> {
        self.license.as_ref().and_then(|l| l.spdx_id.as_deref())
    }
}

/// The `license` object of a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// Release history summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseInfo {
    /// Creation time of the newest release.
    pub latest: Option<DateTime<Utc>>,
    /// Total number of releases.
    pub count: u64,
}

/// Core API quota, read once for information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: DateTime<Utc>,
}
