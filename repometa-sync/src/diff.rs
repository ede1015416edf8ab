//! Dry-run unified diff support for `repometa diff`.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::{io_err, SyncError};
use crate::project::{plan_file, FilePlan, ProjectInputs};

/// A single document diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render what `frontmatter` would write and compare it to the current
/// on-disk content. No files are written; unchanged and skipped documents
/// produce no entry.
pub fn diff_documents(inputs: &ProjectInputs, root: &Path) -> Result<Vec<FileDiff>, SyncError> {
    let mut diffs = Vec::new();
    for path in inputs.documents()? {
        let rendered = match plan_file(&path, &inputs.records, &inputs.people)? {
            FilePlan::Write(content) => content,
            FilePlan::Skip { .. } => continue,
        };
        let existing = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        if existing == rendered {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use repometa_core::{store, RecordStore, RepoRecord, SiteLayout};
    use tempfile::TempDir;

    use super::*;
    use crate::project::project_all;

    fn site() -> (TempDir, SiteLayout) {
        let dir = TempDir::new().expect("site");
        let layout = SiteLayout::new(dir.path());
        let mut record = RepoRecord::new("acme/widget");
        record.name = Some("Widget".into());
        record.stars = Some(10);
        store::save_at(&layout.repos_file(), &RecordStore::from_records([record])).expect("store");

        let doc = layout.software_dir().join("widget/_index.md");
        fs::create_dir_all(doc.parent().expect("parent")).expect("mkdir");
        fs::write(&doc, "---\ngithub: acme/widget\n---\nBody\n").expect("doc");
        (dir, layout)
    }

    #[test]
    fn diff_shows_pending_change_without_writing() {
        let (_dir, layout) = site();
        let doc = layout.software_dir().join("widget/_index.md");
        let before = fs::read_to_string(&doc).expect("read");

        let inputs = ProjectInputs::load(&layout).expect("inputs");
        let diffs = diff_documents(&inputs, layout.root()).expect("diff");

        assert_eq!(diffs.len(), 1);
        let diff = &diffs[0].unified_diff;
        assert!(diff.contains("a/content/software/widget/_index.md"));
        assert!(diff.contains("+title: Widget"));
        assert_eq!(fs::read_to_string(&doc).expect("read"), before);
    }

    #[test]
    fn no_diffs_after_projection() {
        let (_dir, layout) = site();
        let inputs = ProjectInputs::load(&layout).expect("inputs");
        project_all(&inputs).expect("project");

        let diffs = diff_documents(&inputs, layout.root()).expect("diff");
        assert!(diffs.is_empty(), "projected site should have no diff");
    }
}
