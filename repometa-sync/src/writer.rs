//! Atomic document writer.
//!
//! Content goes to a `<path>.repometa.tmp` sibling first and is then renamed
//! over the target, so readers see either the old file or the new one. When
//! the rename fails the temp file is removed and the original is untouched.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Temp sibling used while writing `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.repometa.tmp", path.display()))
}

/// Atomically replace `path` with `content`.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    atomic_write_with_tmp(path, content, &tmp_path(path))
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Err(e) = std::fs::write(tmp, content) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(tmp, e));
    }
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!("wrote: {}", path.display());
    Ok(())
}
