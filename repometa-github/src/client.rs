//! Blocking GitHub REST client built on `ureq`.
//!
//! Pagination follows the `Link: <…>; rel="next"` header. The release count
//! is read from the `rel="last"` page number of a `per_page=1` listing, so it
//! costs a single request.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::GithubError;
use crate::source::RepoSource;
use crate::types::{RateLimit, ReleaseInfo, RepoHandle};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GH_TOKEN";
pub const API_URL_ENV: &str = "GITHUB_API_URL";

const PER_PAGE: u32 = 100;
const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("repometa/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Authenticated client for the GitHub REST API.
pub struct GithubClient {
    agent: ureq::Agent,
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            token: token.into(),
            base_url: DEFAULT_API_URL.to_owned(),
        }
    }

    /// Build from the `GH_TOKEN` environment variable. `GITHUB_API_URL`, when
    /// set, replaces the public API root.
    pub fn from_env() -> Result<Self, GithubError> {
        let client = match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Self::new(token.trim()),
            _ => return Err(GithubError::MissingToken),
        };
        Ok(match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => client.with_base_url(url.trim()),
            _ => client,
        })
    }

    /// Point at a different API root (GitHub Enterprise, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path`. A 404 is `Ok(None)`; every other failure is an error.
    fn get(&self, path: &str, accept: &str) -> Result<Option<ureq::Response>, GithubError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let result = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", accept)
            .set("User-Agent", USER_AGENT)
            .set("X-GitHub-Api-Version", "2022-11-28")
            .call();
        match result {
            Ok(resp) => Ok(Some(resp)),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(ureq::Error::Status(status, resp)) => Err(GithubError::Status {
                url,
                status,
                message: resp.into_string().unwrap_or_default().trim().to_owned(),
            }),
            Err(ureq::Error::Transport(t)) => Err(GithubError::Transport {
                url,
                message: t.to_string(),
            }),
        }
    }

    fn get_required(&self, path: &str, accept: &str) -> Result<ureq::Response, GithubError> {
        self.get(path, accept)?.ok_or_else(|| GithubError::NotFound {
            url: self.url(path),
        })
    }

    /// Collect every page of a JSON array endpoint.
    fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GithubError> {
        let sep = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let page_path = format!("{path}{sep}per_page={PER_PAGE}&page={page}");
            let resp = self.get_required(&page_path, JSON_MEDIA_TYPE)?;
            // Empty repositories answer 204 on some list endpoints.
            if resp.status() == 204 {
                break;
            }
            let has_next = resp
                .header("link")
                .map(|link| link_target(link, "next").is_some())
                .unwrap_or(false);
            let batch: Vec<T> = decode(&self.url(&page_path), resp)?;
            items.extend(batch);
            if !has_next {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

impl RepoSource for GithubClient {
    fn org_repos(&self, org: &str) -> Result<Vec<RepoHandle>, GithubError> {
        self.get_paged(&format!("/orgs/{org}/repos?type=public"))
    }

    fn releases(&self, repo: &RepoHandle) -> Result<ReleaseInfo, GithubError> {
        #[derive(Deserialize)]
        struct Release {
            created_at: Option<DateTime<Utc>>,
        }

        let path = format!("/repos/{}/releases?per_page=1", repo.full_name);
        let resp = self.get_required(&path, JSON_MEDIA_TYPE)?;
        let last_page = resp
            .header("link")
            .and_then(|link| link_target(link, "last"))
            .and_then(|url| page_number(&url));
        let releases: Vec<Release> = decode(&self.url(&path), resp)?;
        Ok(ReleaseInfo {
            latest: releases.first().and_then(|r| r.created_at),
            count: last_page.unwrap_or(releases.len() as u64),
        })
    }

    fn contributors(&self, repo: &RepoHandle) -> Result<Vec<String>, GithubError> {
        #[derive(Deserialize)]
        struct Contributor {
            login: Option<String>,
        }

        let list: Vec<Contributor> =
            self.get_paged(&format!("/repos/{}/contributors", repo.full_name))?;
        Ok(list.into_iter().filter_map(|c| c.login).collect())
    }

    fn readme(&self, repo: &RepoHandle) -> Result<Option<String>, GithubError> {
        let path = format!("/repos/{}/readme", repo.full_name);
        let Some(resp) = self.get(&path, RAW_MEDIA_TYPE)? else {
            return Ok(None);
        };
        resp.into_string().map(Some).map_err(|e| GithubError::Decode {
            url: self.url(&path),
            message: e.to_string(),
        })
    }

    fn rate_limit(&self) -> Result<RateLimit, GithubError> {
        #[derive(Deserialize)]
        struct Payload {
            resources: Resources,
        }
        #[derive(Deserialize)]
        struct Resources {
            core: Core,
        }
        #[derive(Deserialize)]
        struct Core {
            limit: u64,
            remaining: u64,
            reset: i64,
        }

        let path = "/rate_limit";
        let resp = self.get_required(path, JSON_MEDIA_TYPE)?;
        let payload: Payload = decode(&self.url(path), resp)?;
        let core = payload.resources.core;
        Ok(RateLimit {
            limit: core.limit,
            remaining: core.remaining,
            reset: DateTime::from_timestamp(core.reset, 0).unwrap_or_default(),
        })
    }
}

fn decode<T: DeserializeOwned>(url: &str, resp: ureq::Response) -> Result<T, GithubError> {
    resp.into_json().map_err(|e| GithubError::Decode {
        url: url.to_owned(),
        message: e.to_string(),
    })
}

/// Target URL of the `rel` entry in a `Link` header.
pub(crate) fn link_target(header: &str, rel: &str) -> Option<String> {
    let wanted = format!("rel=\"{rel}\"");
    header.split(',').find_map(|part| {
        let (url, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == wanted) {
            return None;
        }
        let url = url.trim().strip_prefix('<')?.strip_suffix('>')?;
        Some(url.to_owned())
    })
}

/// Value of the `page` query parameter of `url`.
pub(crate) fn page_number(url: &str) -> Option<u64> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "<https://api.github.com/repositories/1/releases?per_page=1&page=2>; rel=\"next\", \
                        <https://api.github.com/repositories/1/releases?per_page=1&page=37>; rel=\"last\"";

    #[test]
    fn finds_next_and_last_targets() {
        assert_eq!(
            link_target(LINK, "next").as_deref(),
            Some("https://api.github.com/repositories/1/releases?per_page=1&page=2")
        );
        assert!(link_target(LINK, "last").is_some());
        assert_eq!(link_target(LINK, "prev"), None);
    }

    #[test]
    fn page_number_ignores_per_page() {
        let last = link_target(LINK, "last").unwrap();
        assert_eq!(page_number(&last), Some(37));
        assert_eq!(page_number("https://x/y?per_page=5"), None);
        assert_eq!(page_number("https://x/y"), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = GithubClient::new("t").with_base_url("http://localhost:9/");
        assert_eq!(client.url("/rate_limit"), "http://localhost:9/rate_limit");
    }

    #[test]
    fn missing_token_message_names_variable() {
        assert!(GithubError::MissingToken.to_string().contains("GH_TOKEN"));
    }
}
