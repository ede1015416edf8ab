//! Site layout and organization config.
//!
//! ```text
//! <root>/
//!   data/
//!     github-orgs.toml     (orgs = ["acme", …])
//!     github-repos.toml    (record store)
//!   content/
//!     software/<name>/_index.md
//!     people/<name>/_index.md
//! ```
//!
//! Path helpers are pure; only [`load_orgs`] and [`index_files_in`] touch disk.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{io_err, CoreError};

pub const ORGS_FILE: &str = "github-orgs.toml";
pub const REPOS_FILE: &str = "github-repos.toml";
pub const INDEX_FILE: &str = "_index.md";

/// Paths of the site tree, all derived from one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    root: PathBuf,
}

impl SiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn orgs_file(&self) -> PathBuf {
        self.data_dir().join(ORGS_FILE)
    }

    pub fn repos_file(&self) -> PathBuf {
        self.data_dir().join(REPOS_FILE)
    }

    pub fn software_dir(&self) -> PathBuf {
        self.root.join("content").join("software")
    }

    pub fn people_dir(&self) -> PathBuf {
        self.root.join("content").join("people")
    }
}

#[derive(Debug, Deserialize)]
struct OrgsFile {
    #[serde(default)]
    orgs: Vec<String>,
}

/// Read the organization list from `path`.
///
/// Missing file, parse failure and an empty list are all configuration errors.
pub fn load_orgs(path: &Path) -> Result<Vec<String>, CoreError> {
    if !path.exists() {
        return Err(CoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let file: OrgsFile = toml::from_str(&contents).map_err(|e| CoreError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    if file.orgs.is_empty() {
        return Err(CoreError::NoOrganizations {
            path: path.to_path_buf(),
        });
    }
    Ok(file.orgs)
}

/// Every `<dir>/*/_index.md`, sorted by path.
pub fn index_files_in(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path().join(INDEX_FILE))
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
