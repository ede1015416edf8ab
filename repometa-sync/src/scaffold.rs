//! Create `content/software/<name>/_index.md` stubs for popular repositories.

use std::path::Path;

use repometa_core::{layout::INDEX_FILE, RecordStore, RepoKey, RepoRecord};

use crate::error::{io_err, SyncError};

pub const DEFAULT_MINIMAL_STARS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldStatus {
    Created,
    Skipped,
    Error,
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub repo: RepoKey,
    pub software: Option<String>,
    pub status: ScaffoldStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub dry_run: bool,
    pub minimal_stars: u64,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            minimal_stars: DEFAULT_MINIMAL_STARS,
        }
    }
}

/// Stub document for `repo`.
pub fn stub_content(repo: &RepoKey) -> String {
    format!("---\ngithub: {repo}\n---\n")
}

fn scaffold_one(software_dir: &Path, record: &RepoRecord, options: ScaffoldOptions) -> ScaffoldOutcome {
    let outcome = |software: Option<String>, status, message: String| ScaffoldOutcome {
        repo: record.repo.clone(),
        software,
        status,
        message,
    };

    let Some(name) = record.name.as_deref().map(str::to_lowercase).filter(|n| !n.is_empty()) else {
        return outcome(None, ScaffoldStatus::Skipped, "no name field".into());
    };
    let stars = record.stars.unwrap_or(0);
    if stars < options.minimal_stars {
        return outcome(
            None,
            ScaffoldStatus::Skipped,
            format!("too few stars ({stars} < {})", options.minimal_stars),
        );
    }

    let target = software_dir.join(&name);
    if target.exists() {
        return outcome(Some(name), ScaffoldStatus::Skipped, "already exists".into());
    }
    if options.dry_run {
        return outcome(Some(name), ScaffoldStatus::Created, "would create (dry-run)".into());
    }

    let index = target.join(INDEX_FILE);
    let written = std::fs::create_dir_all(&target)
        .map_err(|e| io_err(&target, e))
        .and_then(|()| std::fs::write(&index, stub_content(&record.repo)).map_err(|e| io_err(&index, e)));
    match written {
        Ok(()) => {
            tracing::info!(repo = %record.repo, "created {}", index.display());
            outcome(Some(name), ScaffoldStatus::Created, "created".into())
        }
        Err(e) => {
            tracing::error!(repo = %record.repo, "{e}");
            outcome(Some(name), ScaffoldStatus::Error, e.to_string())
        }
    }
}

/// Scaffold every record in store order.
pub fn scaffold_all(
    software_dir: &Path,
    records: &RecordStore,
    options: ScaffoldOptions,
) -> Result<Vec<ScaffoldOutcome>, SyncError> {
    if !software_dir.is_dir() {
        return Err(SyncError::MissingDir {
            path: software_dir.to_path_buf(),
        });
    }
    Ok(records
        .iter()
        .map(|record| scaffold_one(software_dir, record, options))
        .collect())
}
