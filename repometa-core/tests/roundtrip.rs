//! Roundtrip tests for the record store file and front-matter documents.
//!
//! Each `#[case]` is isolated; no shared state.

use repometa_core::{store, Document, RecordStore, RepoRecord};
use rstest::rstest;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minimal_store() -> RecordStore {
    RecordStore::from_records([RepoRecord::new("acme/widget")])
}

fn full_store() -> RecordStore {
    let mut r = RepoRecord::new("acme/widget");
    r.name = Some("widget".into());
    r.description = Some("A widget".into());
    r.website = Some(String::new());
    r.stars = Some(10);
    r.forks = Some(2);
    r.latest_release = Some("2024-05-01T10:00:00+00:00".into());
    r.releases = Some(4);
    r.first_commit = Some("2019-01-01T00:00:00+00:00".into());
    r.license = Some("MIT".into());
    r.language = Some("Rust".into());
    r.contributors = Some(vec!["ada".into(), "grace".into()]);
    r.readme_image = Some("https://example.com/logo.png".into());
    r.last_updated = Some("2025-01-01T12:00:00.000000+00:00".into());
    RecordStore::from_records([r])
}

fn unicode_store() -> RecordStore {
    let mut r = RepoRecord::new("acme/アプリ");
    r.description = Some("日本語・한국어・العربية \"quoted\" 'single' <>&".into());
    r.contributors = Some(vec!["пользователь".into()]);
    RecordStore::from_records([r])
}

fn extra_keys_store() -> RecordStore {
    let mut r = RepoRecord::new("acme/widget");
    r.stars = Some(1);
    r.extra.insert("topic".into(), toml::Value::String("tools".into()));
    r.extra.insert("pinned".into(), toml::Value::Boolean(true));
    RecordStore::from_records([r, RepoRecord::new("acme/gadget")])
}

// ---------------------------------------------------------------------------
// Parameterised store roundtrip
// ---------------------------------------------------------------------------

#[rstest]
#[case("minimal", minimal_store())]
#[case("all_fields", full_store())]
#[case("unicode_strings", unicode_store())]
#[case("extra_keys", extra_keys_store())]
fn store_roundtrip(#[case] label: &str, #[case] records: RecordStore) {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("github-repos.toml");
    store::save_at(&path, &records).unwrap_or_else(|e| panic!("[{label}] save failed: {e}"));
    let back = store::load_at(&path).unwrap_or_else(|e| panic!("[{label}] load failed: {e}"));
    assert_eq!(back, records, "[{label}] store");
}

#[test]
fn hand_written_store_survives_rewrite() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("github-repos.toml");
    std::fs::write(
        &path,
        "[[repos]]\nrepo = \"acme/widget\"\nstars = 3\nnotes = \"keep me\"\n",
    )
    .expect("write");

    let loaded = store::load_at(&path).expect("load");
    store::save_at(&path, &loaded).expect("save");
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.contains("notes = \"keep me\""), "got:\n{text}");
}

// ---------------------------------------------------------------------------
// Front-matter roundtrip
// ---------------------------------------------------------------------------

#[rstest]
#[case("scalars", "---\ntitle: Widget\ngithub: acme/widget\n---\nbody\n")]
#[case("nested", "---\nexternal:\n  title: Widget\n  stars: 10\n  languages:\n  - Rust\n---\n")]
#[case("unicode", "---\ntitle: 日本語\npeople:\n- Ada\n- Grace\n---\n# Héading\n\ntext")]
#[case("empty_body", "---\ntitle: x\n---\n")]
fn document_roundtrip(#[case] label: &str, #[case] src: &str) {
    let doc = Document::parse(src).unwrap_or_else(|e| panic!("[{label}] parse failed: {e}"));
    let rendered = doc
        .render()
        .unwrap_or_else(|e| panic!("[{label}] render failed: {e}"));
    let back =
        Document::parse(&rendered).unwrap_or_else(|e| panic!("[{label}] reparse failed: {e}"));
    assert_eq!(back, doc, "[{label}] document");
    assert_eq!(back.body, doc.body, "[{label}] body");
}
