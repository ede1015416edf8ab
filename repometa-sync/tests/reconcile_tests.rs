use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{Duration, TimeZone, Utc};
use rstest::rstest;
use tempfile::TempDir;

use repometa_core::{store, Field, RecordStore, RepoKey, RepoRecord};
use repometa_github::{FakeSource, ReleaseInfo, RepoHandle};
use repometa_sync::{
    refresh_all, refresh_org, should_refresh_at, FieldSelection, ReconcileOptions,
};

fn handle(full_name: &str, stars: u64) -> RepoHandle {
    let mut repo = RepoHandle::new(full_name);
    repo.stargazers_count = stars;
    repo.description = Some(format!("{full_name} does things"));
    repo
}

fn explicit(fields: &[Field]) -> ReconcileOptions {
    ReconcileOptions {
        selection: FieldSelection::Explicit(fields.iter().copied().collect()),
        force: false,
    }
}

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data/github-repos.toml")
}

fn records_on_disk(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|s| s.matches("[[repos]]").count())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Staleness window
// ---------------------------------------------------------------------------

#[rstest]
#[case::just_now(0, false)]
#[case::one_hour(60, false)]
#[case::just_under(12 * 60 - 1, false)]
#[case::exactly_twelve(12 * 60, true)]
#[case::one_day(24 * 60, true)]
#[case::one_month(30 * 24 * 60, true)]
fn refresh_window_is_twelve_hours(#[case] minutes_ago: i64, #[case] expected: bool) {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut record = RepoRecord::new("acme/widget");
    record.last_updated = Some((now - Duration::minutes(minutes_ago)).to_rfc3339());

    assert_eq!(
        should_refresh_at(Some(&record), false, now).needs_refresh(),
        expected
    );
    assert!(should_refresh_at(Some(&record), true, now).needs_refresh());
}

// ---------------------------------------------------------------------------
// Field-level merge
// ---------------------------------------------------------------------------

#[test]
fn subset_refresh_leaves_other_fields_untouched() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);

    let mut existing = RepoRecord::new("acme/widget");
    existing.name = Some("Widget".into());
    existing.stars = Some(1);
    existing.license = Some("Apache-2.0".into());
    existing.contributors = Some(vec!["ada".into()]);
    existing.extra.insert("notes".into(), toml_string("hand written"));
    let before = existing.clone();
    let mut records = RecordStore::from_records([existing]);

    let source = FakeSource::new().with_org("acme", vec![handle("acme/widget", 77)]);
    let options = ReconcileOptions {
        force: true,
        ..explicit(&[Field::Stars])
    };
    let outcome = refresh_org(&source, &mut records, &path, "acme", &options);

    assert_eq!(outcome.updated, vec![RepoKey::from("acme/widget")]);
    let after = records.get(&RepoKey::from("acme/widget")).unwrap();
    assert_eq!(after.stars, Some(77));
    assert_eq!(after.name, before.name);
    assert_eq!(after.license, before.license);
    assert_eq!(after.contributors, before.contributors);
    assert_eq!(after.description, None, "description was not requested");
    assert_eq!(after.extra, before.extra);
    assert_ne!(after.last_updated, before.last_updated);

    let reloaded = store::load_at(&path).unwrap();
    assert_eq!(reloaded.get(&RepoKey::from("acme/widget")), Some(after));
}

fn toml_string(s: &str) -> toml::Value {
    toml::Value::String(s.to_owned())
}

// ---------------------------------------------------------------------------
// Durability
// ---------------------------------------------------------------------------

#[test]
fn store_is_flushed_before_next_repository() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let observer_seen = Rc::clone(&seen);
    let observer_path = path.clone();
    let source = FakeSource::new()
        .with_org(
            "acme",
            vec![handle("acme/a", 1), handle("acme/b", 2), handle("acme/c", 3)],
        )
        .with_observer(move |call| {
            if call.starts_with("contributors") {
                observer_seen
                    .borrow_mut()
                    .push(records_on_disk(&observer_path));
            }
        });

    let mut records = RecordStore::new();
    let outcome = refresh_org(
        &source,
        &mut records,
        &path,
        "acme",
        &explicit(&[Field::Contributors]),
    );

    assert_eq!(outcome.updated.len(), 3);
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(records_on_disk(&path), 3);
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[test]
fn field_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    let source = FakeSource::new()
        .with_org("acme", vec![handle("acme/a", 5), handle("acme/b", 6)])
        .with_contributors("acme/b", &["grace"])
        .failing_contributors("acme/a");

    let mut records = RecordStore::new();
    let outcome = refresh_org(
        &source,
        &mut records,
        &path,
        "acme",
        &explicit(&[Field::Stars, Field::Contributors]),
    );

    assert_eq!(outcome.updated.len(), 2);
    assert!(!outcome.has_errors());
    assert_eq!(outcome.field_failures.len(), 1);
    assert_eq!(outcome.field_failures[0].field, Field::Contributors);

    let a = records.get(&RepoKey::from("acme/a")).unwrap();
    assert_eq!(a.contributors, None);
    assert_eq!(a.stars, Some(5));
    let b = records.get(&RepoKey::from("acme/b")).unwrap();
    assert_eq!(b.contributors, Some(vec!["grace".to_owned()]));
}

#[test]
fn org_listing_failure_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    let source = FakeSource::new()
        .failing_org("broken")
        .with_org("acme", vec![handle("acme/a", 1)]);

    let mut records = RecordStore::new();
    let orgs = vec!["broken".to_owned(), "acme".to_owned()];
    let outcomes = refresh_all(&source, &mut records, &path, &orgs, &ReconcileOptions::default());

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].list_error.is_some());
    assert!(!outcomes[0].has_errors(), "a failed listing is recovered");
    assert!(outcomes.iter().all(|o| !o.has_errors()));
    assert_eq!(outcomes[1].updated, vec![RepoKey::from("acme/a")]);
}

#[test]
fn unwritable_store_is_a_repository_error() {
    let dir = TempDir::new().unwrap();
    // A directory where the store file should be makes every flush fail.
    let path = dir.path().join("github-repos.toml");
    std::fs::create_dir_all(&path).unwrap();

    let source = FakeSource::new().with_org("acme", vec![handle("acme/a", 1), handle("acme/b", 2)]);
    let mut records = RecordStore::new();
    let outcome = refresh_org(&source, &mut records, &path, "acme", &explicit(&[Field::Stars]));

    assert!(outcome.updated.is_empty());
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.has_errors());
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

#[test]
fn archived_repositories_are_skipped_even_when_forced() {
    let dir = TempDir::new().unwrap();
    let mut archived = handle("acme/old", 900);
    archived.archived = true;
    let source = FakeSource::new().with_org("acme", vec![archived]);

    let mut records = RecordStore::new();
    let options = ReconcileOptions {
        force: true,
        ..ReconcileOptions::default()
    };
    let outcome = refresh_org(&source, &mut records, &store_path(&dir), "acme", &options);

    assert!(outcome.updated.is_empty());
    assert_eq!(outcome.skipped[0].reason, "archived");
    assert!(records.is_empty());
}

#[test]
fn fresh_records_are_skipped_with_age() {
    let dir = TempDir::new().unwrap();
    let mut record = RepoRecord::new("acme/a");
    record.last_updated = Some((Utc::now() - Duration::hours(2)).to_rfc3339());
    let mut records = RecordStore::from_records([record]);
    let source = FakeSource::new().with_org("acme", vec![handle("acme/a", 1), handle("acme/b", 1)]);

    let outcome = refresh_org(
        &source,
        &mut records,
        &store_path(&dir),
        "acme",
        &ReconcileOptions::default(),
    );

    assert_eq!(outcome.updated, vec![RepoKey::from("acme/b")]);
    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.skipped[0].reason.starts_with("updated "));
}

#[test]
fn empty_selection_fetches_nothing() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir);
    let source = FakeSource::new().with_org("acme", vec![handle("acme/a", 1)]);
    let (selection, rejected) = FieldSelection::parse("nonsense");
    assert_eq!(rejected.len(), 1);

    let mut records = RecordStore::new();
    let options = ReconcileOptions {
        selection,
        force: true,
    };
    let outcome = refresh_org(&source, &mut records, &path, "acme", &options);

    assert!(outcome.updated.is_empty());
    assert_eq!(outcome.skipped[0].reason, "no fields requested");
    assert_eq!(source.calls(), ["repos acme"]);
    assert!(!path.exists());
}

#[test]
fn all_fields_request_release_listing_once() {
    let dir = TempDir::new().unwrap();
    let latest = Utc.with_ymd_and_hms(2024, 4, 5, 6, 7, 8).unwrap();
    let source = FakeSource::new()
        .with_org("acme", vec![handle("acme/a", 1)])
        .with_releases(
            "acme/a",
            ReleaseInfo {
                latest: Some(latest),
                count: 3,
            },
        )
        .with_readme(
            "acme/a",
            "<img src=\"https://x/badge.svg\"><img src=\"https://x/shot.png\">",
        );

    let mut records = RecordStore::new();
    refresh_org(
        &source,
        &mut records,
        &store_path(&dir),
        "acme",
        &ReconcileOptions::default(),
    );

    let calls = source.calls();
    assert_eq!(calls.iter().filter(|c| c.starts_with("releases")).count(), 1);
    let a = records.get(&RepoKey::from("acme/a")).unwrap();
    assert_eq!(a.releases, Some(3));
    assert_eq!(a.latest_release.as_deref(), Some("2024-04-05T06:07:08+00:00"));
    assert_eq!(a.readme_image.as_deref(), Some("https://x/shot.png"));
    assert_eq!(a.website.as_deref(), Some(""));
}
