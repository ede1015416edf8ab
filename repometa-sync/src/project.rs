//! Front-matter projection: cached records into software documents.
//!
//! Each document naming a repository under `github:` gets an `external`
//! block mirroring the cached record, plus a handful of top-level keys
//! derived from that block and the document's own `include`, `exclude` and
//! `override` directives.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use repometa_core::{
    layout, store, Document, FrontMatterError, PersonDirectory, RecordStore, RepoKey, RepoRecord,
    SiteLayout,
};

use crate::error::{io_err, SyncError};
use crate::writer;

/// Top-level keys computed by [`derive_top_level`], in output order.
pub const DERIVED_KEYS: [&str; 6] = [
    "title",
    "people",
    "description",
    "website",
    "latest_release",
    "languages",
];

const EXTERNAL_KEY: &str = "external";
const GITHUB_KEY: &str = "github";

/// Result of projecting one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Updated(Document),
    Skipped { reason: String },
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

fn text(s: &str) -> Value {
    Value::String(s.to_owned())
}

fn list(items: &[String]) -> Value {
    Value::Sequence(items.iter().map(|s| text(s)).collect())
}

/// The `external` block for `record`.
///
/// Contributors are mapped through `people` into `people`; unknown logins
/// are dropped and the key is omitted when nobody matched.
pub fn extract_external(record: &RepoRecord, people: &PersonDirectory) -> Mapping {
    let mut out = Mapping::new();
    let mut put = |key: &str, value: Value| {
        out.insert(text(key), value);
    };

    if let Some(name) = &record.name {
        put("title", text(name));
    }
    put("repo", text(record.repo.as_str()));
    if let Some(v) = &record.description {
        put("description", text(v));
    }
    if let Some(v) = &record.website {
        put("website", text(v));
    }
    if let Some(v) = record.stars {
        put("stars", Value::from(v));
    }
    if let Some(v) = record.forks {
        put("forks", Value::from(v));
    }
    if let Some(v) = &record.latest_release {
        put("latest_release", text(v));
    }
    if let Some(v) = &record.first_commit {
        put("first_commit", text(v));
    }
    if let Some(v) = &record.license {
        put("license", text(v));
    }
    if let Some(v) = &record.contributors {
        put("contributors", list(v));
    }
    if let Some(v) = &record.readme_image {
        put("readme_image", text(v));
    }
    if let Some(v) = &record.last_updated {
        put("last_updated", text(v));
    }
    if let Some(v) = &record.language {
        put("languages", list(std::slice::from_ref(v)));
    }

    let names: Vec<String> = record
        .contributors
        .iter()
        .flatten()
        .filter_map(|login| people.name_for(login))
        .map(str::to_owned)
        .collect();
    if !names.is_empty() {
        put("people", list(&names));
    }
    out
}

/// Compute the derived top-level keys.
///
/// Per key: start from `external`; a list gains `include` items (first
/// occurrence wins) and then loses `exclude` items; an `override` entry
/// replaces the value outright, null included. Null results are omitted.
pub fn derive_top_level(
    external: &Mapping,
    include: &Mapping,
    exclude: &Mapping,
    overrides: &Mapping,
) -> Mapping {
    let mut out = Mapping::new();
    for key in DERIVED_KEYS {
        let mut value = external.get(key).cloned().unwrap_or(Value::Null);

        if let (Value::Sequence(items), Some(Value::Sequence(extra))) = (&mut value, include.get(key)) {
            let mut merged: Vec<Value> = Vec::with_capacity(items.len() + extra.len());
            for item in items.iter().chain(extra) {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            *items = merged;
        }
        if let (Value::Sequence(items), Some(Value::Sequence(drop))) = (&mut value, exclude.get(key)) {
            items.retain(|item| !drop.contains(item));
        }
        if let Some(replacement) = overrides.get(key) {
            value = replacement.clone();
        }

        if !value.is_null() {
            out.insert(text(key), value);
        }
    }
    out
}

/// A directive block from the header; anything but a mapping counts as empty.
fn directive(header: &Mapping, key: &str) -> Mapping {
    match header.get(key) {
        Some(Value::Mapping(map)) => map.clone(),
        _ => Mapping::new(),
    }
}

/// Project `document` against `records`.
///
/// Documents without a `github` string, or naming a repository that is not
/// cached, are skipped and left untouched.
pub fn project(document: &Document, records: &RecordStore, people: &PersonDirectory) -> Projection {
    let Some(github) = document.get_str(GITHUB_KEY).map(str::trim).filter(|s| !s.is_empty()) else {
        return Projection::Skipped {
            reason: "no 'github' field".to_owned(),
        };
    };
    let Some(record) = records.get(&RepoKey::from(github)) else {
        return Projection::Skipped {
            reason: format!("repository '{github}' not found in store"),
        };
    };

    let external = extract_external(record, people);
    let derived = derive_top_level(
        &external,
        &directive(&document.header, "include"),
        &directive(&document.header, "exclude"),
        &directive(&document.header, "override"),
    );

    let mut header = document.header.clone();
    header.insert(text(EXTERNAL_KEY), Value::Mapping(external));
    for (key, value) in derived {
        header.insert(key, value);
    }
    Projection::Updated(Document::new(header, document.body.clone()))
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// What projecting one file would do.
#[derive(Debug, Clone, PartialEq)]
pub enum FilePlan {
    /// New file content.
    Write(String),
    /// Left alone. `malformed` marks documents whose header is unusable.
    Skip { reason: String, malformed: bool },
}

/// Decide what to do with the document at `path`. Reads only.
pub fn plan_file(
    path: &Path,
    records: &RecordStore,
    people: &PersonDirectory,
) -> Result<FilePlan, SyncError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let document = match Document::parse(&content) {
        Ok(doc) if doc.header.is_empty() => {
            return Ok(FilePlan::Skip {
                reason: "no front-matter".to_owned(),
                malformed: true,
            })
        }
        Ok(doc) => doc,
        Err(FrontMatterError::Missing) => {
            return Ok(FilePlan::Skip {
                reason: "no front-matter".to_owned(),
                malformed: true,
            })
        }
        Err(e) => {
            return Ok(FilePlan::Skip {
                reason: e.to_string(),
                malformed: true,
            })
        }
    };

    match project(&document, records, people) {
        Projection::Skipped { reason } => Ok(FilePlan::Skip {
            reason,
            malformed: false,
        }),
        Projection::Updated(doc) => {
            let rendered = doc.render().map_err(SyncError::from)?;
            Ok(FilePlan::Write(rendered))
        }
    }
}

/// Counts and details of a projection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub updated: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Everything a projection run reads: the cached records and the people.
#[derive(Debug, Clone)]
pub struct ProjectInputs {
    pub software_dir: PathBuf,
    pub records: RecordStore,
    pub people: PersonDirectory,
}

impl ProjectInputs {
    /// Load inputs for the site at `layout`.
    ///
    /// A missing software directory, or a missing or unparsable store, is a
    /// configuration error. A missing people directory only warns.
    pub fn load(layout: &SiteLayout) -> Result<Self, SyncError> {
        let software_dir = layout.software_dir();
        if !software_dir.is_dir() {
            return Err(SyncError::MissingDir { path: software_dir });
        }
        let records = store::load_at(&layout.repos_file())?;
        tracing::info!("loaded {} repositories", records.len());
        let people = PersonDirectory::scan(&layout.people_dir());
        tracing::info!("loaded {} people profiles", people.len());
        Ok(Self {
            software_dir,
            records,
            people,
        })
    }

    /// Software documents, sorted by path.
    pub fn documents(&self) -> Result<Vec<PathBuf>, SyncError> {
        Ok(layout::index_files_in(&self.software_dir)?)
    }
}

fn software_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Project every software document, writing changed headers atomically.
pub fn project_all(inputs: &ProjectInputs) -> Result<ProjectSummary, SyncError> {
    let files = inputs.documents()?;
    if files.is_empty() {
        tracing::warn!("no _index.md files found in {}", inputs.software_dir.display());
    }

    let mut summary = ProjectSummary::default();
    for path in files {
        let name = software_name(&path);
        let plan = plan_file(&path, &inputs.records, &inputs.people)
            .and_then(|plan| match plan {
                FilePlan::Write(content) => writer::atomic_write(&path, &content).map(|()| None),
                FilePlan::Skip { reason, malformed } => Ok(Some((reason, malformed))),
            });
        match plan {
            Ok(None) => {
                tracing::info!("updated {name}");
                summary.updated.push(path);
            }
            Ok(Some((reason, malformed))) => {
                if malformed {
                    tracing::warn!("skipped {name}: {reason}");
                } else {
                    tracing::info!("skipped {name}: {reason}");
                }
                summary.skipped.push((path, reason));
            }
            Err(e) => {
                tracing::error!("failed to process {name}: {e}");
                summary.errors.push((path, e.to_string()));
            }
        }
    }
    Ok(summary)
}
