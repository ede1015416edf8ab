//! Person directory: GitHub login → display name, scanned from
//! `content/people/*/_index.md`.

use std::collections::HashMap;
use std::path::Path;

use crate::document::Document;
use crate::layout::index_files_in;

/// Read-only login → name lookup, rebuilt on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDirectory {
    names: HashMap<String, String>,
}

impl PersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; later entries for the same login win.
    pub fn insert(&mut self, login: impl Into<String>, name: impl Into<String>) {
        self.names.insert(login.into(), name.into());
    }

    pub fn name_for(&self, login: &str) -> Option<&str> {
        self.names.get(login).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Scan `people_dir/*/_index.md`. Only profiles with non-empty string
    /// `github` and `title` keys contribute. Unreadable or malformed profiles
    /// are skipped with a warning; a missing directory yields an empty lookup.
    pub fn scan(people_dir: &Path) -> Self {
        let mut directory = Self::new();
        if !people_dir.exists() {
            tracing::warn!(path = %people_dir.display(), "people directory not found");
            return directory;
        }

        let files = match index_files_in(people_dir) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list people profiles");
                return directory;
            }
        };

        for file in files {
            let content = match std::fs::read_to_string(&file) {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(path = %file.display(), error = %err, "failed to read profile");
                    continue;
                }
            };
            let Ok(doc) = Document::parse(&content) else {
                continue;
            };
            let login = doc.get_str("github").map(str::trim).unwrap_or_default();
            let name = doc.get_str("title").map(str::trim).unwrap_or_default();
            if !login.is_empty() && !name.is_empty() {
                directory.insert(login, name);
            }
        }

        tracing::debug!(profiles = directory.len(), "loaded people profiles");
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn profile(root: &Path, dir: &str, content: &str) {
        let d = root.join(dir);
        fs::create_dir_all(&d).unwrap();
        fs::write(d.join("_index.md"), content).unwrap();
    }

    #[test]
    fn scans_profiles_with_both_keys() {
        let tmp = TempDir::new().unwrap();
        profile(tmp.path(), "ada", "---\ntitle: Ada Lovelace\ngithub: ada\n---\n");
        profile(tmp.path(), "nogh", "---\ntitle: No Handle\n---\n");
        profile(tmp.path(), "blank", "---\ntitle: '  '\ngithub: blank\n---\n");
        profile(tmp.path(), "broken", "no front matter here");

        let dir = PersonDirectory::scan(tmp.path());
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.name_for("ada"), Some("Ada Lovelace"));
        assert_eq!(dir.name_for("blank"), None);
    }

    #[test]
    fn values_are_trimmed() {
        let tmp = TempDir::new().unwrap();
        profile(tmp.path(), "g", "---\ntitle: ' Grace '\ngithub: ' grace '\n---\n");
        let dir = PersonDirectory::scan(tmp.path());
        assert_eq!(dir.name_for("grace"), Some("Grace"));
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let dir = PersonDirectory::scan(&tmp.path().join("people"));
        assert!(dir.is_empty());
    }
}
