//! In-memory [`RepoSource`] for tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{TimeZone, Utc};

use crate::error::GithubError;
use crate::source::RepoSource;
use crate::types::{RateLimit, ReleaseInfo, RepoHandle};

type Observer = Box<dyn Fn(&str)>;

/// Canned answers keyed by organization or repository full name.
///
/// Every call is recorded as `"<method> <arg>"`; an optional observer sees
/// each label before the answer is returned.
#[derive(Default)]
pub struct FakeSource {
    orgs: HashMap<String, Vec<RepoHandle>>,
    releases: HashMap<String, ReleaseInfo>,
    contributors: HashMap<String, Vec<String>>,
    readmes: HashMap<String, String>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
    observer: Option<Observer>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org(mut self, org: &str, repos: Vec<RepoHandle>) -> Self {
        self.orgs.insert(org.to_owned(), repos);
        self
    }

    pub fn with_releases(mut self, repo: &str, info: ReleaseInfo) -> Self {
        self.releases.insert(repo.to_owned(), info);
        self
    }

    pub fn with_contributors(mut self, repo: &str, logins: &[&str]) -> Self {
        self.contributors
            .insert(repo.to_owned(), logins.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn with_readme(mut self, repo: &str, text: &str) -> Self {
        self.readmes.insert(repo.to_owned(), text.to_owned());
        self
    }

    /// Make the organization listing of `org` fail.
    pub fn failing_org(mut self, org: &str) -> Self {
        self.failing.insert(format!("repos {org}"));
        self
    }

    pub fn failing_releases(mut self, repo: &str) -> Self {
        self.failing.insert(format!("releases {repo}"));
        self
    }

    pub fn failing_contributors(mut self, repo: &str) -> Self {
        self.failing.insert(format!("contributors {repo}"));
        self
    }

    pub fn with_observer(mut self, observer: impl Fn(&str) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Labels of every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, label: String) -> Result<(), GithubError> {
        if let Some(observer) = &self.observer {
            observer(&label);
        }
        let failing = self.failing.contains(&label);
        self.calls.borrow_mut().push(label.clone());
        if failing {
            return Err(GithubError::Status {
                url: format!("fake://{label}"),
                status: 500,
                message: "injected failure".into(),
            });
        }
        Ok(())
    }
}

impl RepoSource for FakeSource {
    fn org_repos(&self, org: &str) -> Result<Vec<RepoHandle>, GithubError> {
        self.record(format!("repos {org}"))?;
        self.orgs
            .get(org)
            .cloned()
            .ok_or_else(|| GithubError::NotFound {
                url: format!("fake://orgs/{org}/repos"),
            })
    }

    fn releases(&self, repo: &RepoHandle) -> Result<ReleaseInfo, GithubError> {
        self.record(format!("releases {}", repo.full_name))?;
        Ok(self
            .releases
            .get(&repo.full_name)
            .cloned()
            .unwrap_or_default())
    }

    fn contributors(&self, repo: &RepoHandle) -> Result<Vec<String>, GithubError> {
        self.record(format!("contributors {}", repo.full_name))?;
        Ok(self
            .contributors
            .get(&repo.full_name)
            .cloned()
            .unwrap_or_default())
    }

    fn readme(&self, repo: &RepoHandle) -> Result<Option<String>, GithubError> {
        self.record(format!("readme {}", repo.full_name))?;
        Ok(self.readmes.get(&repo.full_name).cloned())
    }

    fn rate_limit(&self) -> Result<RateLimit, GithubError> {
        self.record("rate_limit".into())?;
        Ok(RateLimit {
            limit: 5000,
            remaining: 5000,
            reset: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
        })
    }
}
