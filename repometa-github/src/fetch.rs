//! Per-field value retrieval for one repository.

use std::cell::OnceCell;

use chrono::{DateTime, SecondsFormat, Utc};

use repometa_core::{Field, FieldValue};

use crate::error::GithubError;
use crate::readme;
use crate::source::RepoSource;
use crate::types::{ReleaseInfo, RepoHandle};

/// Timestamp format used for every date stored in the data file.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Fetches individual fields of one repository.
///
/// Basic fields come straight from the listing entry. The release listing is
/// requested at most once, whether `latest_release`, `releases` or both are
/// asked for; its error is replayed for the second field.
pub struct FieldFetcher<'a, S: RepoSource + ?Sized> {
    source: &'a S,
    repo: &'a RepoHandle,
    releases: OnceCell<Result<ReleaseInfo, GithubError>>,
}

impl<'a, S: RepoSource + ?Sized> FieldFetcher<'a, S> {
    pub fn new(source: &'a S, repo: &'a RepoHandle) -> Self {
        Self {
            source,
            repo,
            releases: OnceCell::new(),
        }
    }

    /// Current value of `field`; `Ok(None)` when the repository has none.
    pub fn fetch(&self, field: Field) -> Result<Option<FieldValue>, GithubError> {
        let repo = self.repo;
        let value = match field {
            Field::Name => Some(FieldValue::Text(repo.name.clone())),
            Field::Description => Some(FieldValue::Text(
                repo.description.clone().unwrap_or_default(),
            )),
            Field::Website => Some(FieldValue::Text(repo.homepage.clone().unwrap_or_default())),
            Field::Stars => Some(FieldValue::Count(repo.stargazers_count)),
            Field::Forks => Some(FieldValue::Count(repo.forks_count)),
            Field::License => repo.spdx_id().map(|id| FieldValue::Text(id.to_owned())),
            Field::Language => repo.language.clone().map(FieldValue::Text),
            Field::FirstCommit => repo
                .created_at
                .map(|ts| FieldValue::Text(format_timestamp(ts))),
            Field::LatestRelease => self
                .release_info()?
                .latest
                .map(|ts| FieldValue::Text(format_timestamp(ts))),
            Field::Releases => Some(FieldValue::Count(self.release_info()?.count)),
            Field::Contributors => Some(FieldValue::List(self.source.contributors(repo)?)),
            Field::ReadmeImage => self
                .source
                .readme(repo)?
                .and_then(|text| readme::first_image_url(&text))
                .map(FieldValue::Text),
        };
        Ok(value)
    }

    fn release_info(&self) -> Result<ReleaseInfo, GithubError> {
        self.releases
            .get_or_init(|| self.source.releases(self.repo))
            .clone()
    }
}
