//! Error types for repometa-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or saving site data files.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error on load, with the offending file.
    #[error("failed to parse {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// TOML serialization error (store save path).
    #[error("TOML serialization error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// YAML serialization error (front-matter render path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required data file did not exist.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// The organizations file exists but lists no organizations.
    #[error("no organizations listed in {path}")]
    NoOrganizations { path: PathBuf },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
