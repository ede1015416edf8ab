//! Incremental refresh of the record store from a [`RepoSource`].
//!
//! For each organization the listing is partitioned into repositories to
//! refresh and repositories to skip. Each refreshed repository only has its
//! requested fields overwritten, gets a new `last_updated`, and the whole
//! store is flushed to disk before the next repository is touched.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use repometa_core::{store, Field, FieldValue, RecordStore, RepoKey, RepoRecord, UnknownField};
use repometa_github::{FieldFetcher, RepoHandle, RepoSource};

use crate::staleness::{should_refresh_at, Staleness};

const PREVIEW_CHARS: usize = 40;

// ---------------------------------------------------------------------------
// Field selection
// ---------------------------------------------------------------------------

/// Which fields a run overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    All,
    Explicit(BTreeSet<Field>),
}

impl FieldSelection {
    /// Parse a comma-separated list; `basic` expands to [`Field::BASIC`].
    ///
    /// Unknown names are dropped and returned alongside the selection.
    pub fn parse(list: &str) -> (Self, Vec<UnknownField>) {
        let mut fields = BTreeSet::new();
        let mut rejected = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("basic") {
                fields.extend(Field::BASIC);
                continue;
            }
            match name.parse::<Field>() {
                Ok(field) => {
                    fields.insert(field);
                }
                Err(e) => rejected.push(e),
            }
        }
        if !rejected.is_empty() {
            let names: Vec<&str> = rejected.iter().map(|e| e.0.as_str()).collect();
            tracing::warn!(
                "ignoring invalid keys: {}; valid keys are: {}",
                names.join(", "),
                Field::valid_names()
            );
        }
        (FieldSelection::Explicit(fields), rejected)
    }

    /// Selected fields in data-file order.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            FieldSelection::All => Field::ALL.to_vec(),
            FieldSelection::Explicit(set) => set.iter().copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldSelection::Explicit(set) if set.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRepo {
    pub repo: RepoKey,
    pub reason: String,
}

/// A single field that could not be fetched; stored as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub repo: RepoKey,
    pub field: Field,
    pub message: String,
}

/// A repository whose refresh could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFailure {
    pub repo: RepoKey,
    pub message: String,
}

/// Result of refreshing one organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgOutcome {
    pub org: String,
    pub listed: usize,
    pub updated: Vec<RepoKey>,
    pub skipped: Vec<SkippedRepo>,
    pub field_failures: Vec<FieldFailure>,
    pub errors: Vec<RepoFailure>,
    /// Set when the repository listing itself failed.
    pub list_error: Option<String>,
}

impl OrgOutcome {
    fn new(org: &str) -> Self {
        Self {
            org: org.to_owned(),
            ..Self::default()
        }
    }

    /// Whether any repository in this organization failed to persist.
    ///
    /// A failed listing is recovered and reported, not counted here.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Knobs for a reconcile run.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub selection: FieldSelection,
    pub force: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            selection: FieldSelection::All,
            force: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// `last_updated` value for a refresh at `now`.
pub fn refresh_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Build the refreshed record for `repo`.
///
/// Starts from `existing` (or an empty record keyed by the full name) and
/// overwrites exactly `fields`. Fetch errors clear the field and are returned.
pub fn refresh_record<S: RepoSource + ?Sized>(
    existing: Option<&RepoRecord>,
    repo: &RepoHandle,
    fetcher: &FieldFetcher<'_, S>,
    fields: &[Field],
    now: DateTime<Utc>,
) -> (RepoRecord, Vec<FieldFailure>) {
    let key = repo.key();
    let mut record = existing
        .cloned()
        .unwrap_or_else(|| RepoRecord::new(key.clone()));
    record.repo = key.clone();

    let mut failures = Vec::new();
    for &field in fields {
        let value = match fetcher.fetch(field) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(repo = %key, %field, "fetch failed: {e}");
                failures.push(FieldFailure {
                    repo: key.clone(),
                    field,
                    message: e.to_string(),
                });
                None
            }
        };
        tracing::debug!(repo = %key, %field, "{}", preview(value.as_ref()));
        record.set(field, value);
    }
    record.last_updated = Some(refresh_timestamp(now));
    (record, failures)
}

/// Refresh every repository of `org`, flushing `store` to `store_path`
/// after each one.
pub fn refresh_org<S: RepoSource + ?Sized>(
    source: &S,
    store: &mut RecordStore,
    store_path: &Path,
    org: &str,
    options: &ReconcileOptions,
) -> OrgOutcome {
    let mut outcome = OrgOutcome::new(org);
    tracing::info!(org, "scanning repositories");

    let repos = match source.org_repos(org) {
        Ok(repos) => repos,
        Err(e) => {
            tracing::error!(org, "could not list repositories: {e}");
            outcome.list_error = Some(e.to_string());
            return outcome;
        }
    };
    outcome.listed = repos.len();

    let now = Utc::now();
    let mut to_update = Vec::new();
    for repo in &repos {
        let key = repo.key();
        let reason = if repo.archived {
            Some("archived".to_owned())
        } else if options.selection.is_empty() {
            Some("no fields requested".to_owned())
        } else {
            match should_refresh_at(store.get(&key), options.force, now) {
                decision @ Staleness::Fresh { .. } => Some(decision.to_string()),
                decision => {
                    tracing::debug!(repo = %key, "refreshing: {decision}");
                    None
                }
            }
        };
        match reason {
            Some(reason) => outcome.skipped.push(SkippedRepo { repo: key, reason }),
            None => to_update.push(repo),
        }
    }
    tracing::info!(
        org,
        "found {} repos: {} to update, {} to skip",
        repos.len(),
        to_update.len(),
        outcome.skipped.len()
    );

    let fields = options.selection.fields();
    for repo in to_update {
        let key = repo.key();
        tracing::debug!(repo = %key, "url: {}", repo.html_url());
        let fetcher = FieldFetcher::new(source, repo);
        let (record, failures) =
            refresh_record(store.get(&key), repo, &fetcher, &fields, Utc::now());
        outcome.field_failures.extend(failures);
        store.upsert(record);

        match store::save_at(store_path, store) {
            Ok(()) => outcome.updated.push(key),
            Err(e) => {
                tracing::error!(repo = %key, "failed to write store: {e}");
                outcome.errors.push(RepoFailure {
                    repo: key,
                    message: e.to_string(),
                });
            }
        }
    }
    tracing::info!(org, "completed {} repositories", outcome.updated.len());
    outcome
}

/// [`refresh_org`] over every organization, in order.
pub fn refresh_all<S: RepoSource + ?Sized>(
    source: &S,
    store: &mut RecordStore,
    store_path: &Path,
    orgs: &[String],
    options: &ReconcileOptions,
) -> Vec<OrgOutcome> {
    orgs.iter()
        .map(|org| refresh_org(source, store, store_path, org, options))
        .collect()
}

fn preview(value: Option<&FieldValue>) -> String {
    let Some(value) = value else {
        return "None".to_owned();
    };
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_CHARS {
        return text;
    }
    let cut: String = text.chars().take(PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_expands_basic() {
        let (selection, rejected) = FieldSelection::parse(" basic , contributors ");
        assert!(rejected.is_empty());
        let fields = selection.fields();
        assert!(fields.contains(&Field::Contributors));
        for field in Field::BASIC {
            assert!(fields.contains(&field));
        }
        assert!(!fields.contains(&Field::ReadmeImage));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let (selection, rejected) = FieldSelection::parse("stars,stargazers");
        assert_eq!(selection.fields(), vec![Field::Stars]);
        assert_eq!(rejected, vec![UnknownField("stargazers".into())]);
    }

    #[test]
    fn only_unknown_names_is_empty() {
        let (selection, _) = FieldSelection::parse("bogus");
        assert!(selection.is_empty());
        assert!(!FieldSelection::All.is_empty());
    }

    #[test]
    fn preview_truncates_long_values() {
        let long = FieldValue::Text("x".repeat(50));
        let shown = preview(Some(&long));
        assert_eq!(shown, format!("{}...", "x".repeat(37)));
        assert_eq!(shown.chars().count(), 40);
        let exact = FieldValue::Text("y".repeat(40));
        assert_eq!(preview(Some(&exact)), "y".repeat(40));
        assert_eq!(preview(Some(&FieldValue::Count(3))), "3");
        assert_eq!(preview(None), "None");
    }

    #[test]
    fn refresh_timestamp_has_micros_and_offset() {
        use chrono::TimeZone;
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(refresh_timestamp(now), "2025-01-02T03:04:05.000000+00:00");
    }
}
