//! Record store: the `data/github-repos.toml` cache.
//!
//! # File layout
//!
//! ```text
//! [[repos]]
//! repo = "acme/widget"
//! name = "widget"
//! stars = 10
//! last_updated = "2025-01-01T12:00:00.000000+00:00"
//! ```
//!
//! # API pattern
//!
//! The store is read fully into memory with [`load_at`] / [`load_or_empty_at`]
//! and rewritten fully with [`save_at`]. Saving is atomic: serialize, write a
//! `.toml.tmp` sibling, then `rename` over the target, so the file on disk is
//! always a complete record set.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::{RepoKey, RepoRecord};

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Ordered mapping from [`RepoKey`] to [`RepoRecord`].
///
/// Insertion order is kept so that rewrites produce small diffs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<RepoRecord>,
    index: HashMap<RepoKey, usize>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records in file order. A repeated key replaces the
    /// earlier record in its original position.
    pub fn from_records(records: impl IntoIterator<Item = RepoRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    pub fn get(&self, key: &RepoKey) -> Option<&RepoRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Insert a record, replacing any existing record with the same key in place.
    pub fn upsert(&mut self, record: RepoRecord) {
        match self.index.get(&record.repo) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(record.repo.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepoRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    repos: Vec<RepoRecord>,
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load the store at `path`.
///
/// Returns `CoreError::NotFound` if absent, `CoreError::TomlParse` (with the
/// path) if malformed.
pub fn load_at(path: &Path) -> Result<RecordStore, CoreError> {
    if !path.exists() {
        return Err(CoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let file: StoreFile = toml::from_str(&contents).map_err(|e| CoreError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let store = RecordStore::from_records(file.repos);
    tracing::debug!(path = %path.display(), repos = store.len(), "loaded record store");
    Ok(store)
}

/// Like [`load_at`], but a missing file is an empty store.
///
/// A malformed file is still an error: starting from empty would overwrite the
/// existing records on the first flush.
pub fn load_or_empty_at(path: &Path) -> Result<RecordStore, CoreError> {
    match load_at(path) {
        Err(CoreError::NotFound { .. }) => {
            tracing::info!(path = %path.display(), "no existing record store, starting empty");
            Ok(RecordStore::new())
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically rewrite the whole store at `path`.
///
/// Write flow: serialize → `.toml.tmp` sibling → `rename`. The temp file lives
/// in the same directory as the target so the rename never crosses filesystems.
pub fn save_at(path: &Path, store: &RecordStore) -> Result<(), CoreError> {
    let file = StoreFile {
        repos: store.records.clone(),
    };
    let contents = toml::to_string(&file)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// `<path>.tmp`, e.g. `github-repos.toml.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
