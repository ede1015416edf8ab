//! Error types for repometa-sync.

use std::path::PathBuf;

use thiserror::Error;

use repometa_core::CoreError;

/// All errors that can arise from reconcile, projection and scaffold runs.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Store, layout or people-directory failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A required directory does not exist.
    #[error("directory not found: {path}")]
    MissingDir { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
