//! Error types for repometa-github.

use thiserror::Error;

/// All errors that can arise from talking to the GitHub API.
///
/// Transport and decode failures are captured as messages so that one failed
/// request can be reported against several fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GithubError {
    /// No API token in the environment.
    #[error("GitHub token not found; set GH_TOKEN in the environment or in .env")]
    MissingToken,

    /// The server answered 404.
    #[error("GET {url}: not found")]
    NotFound { url: String },

    /// The server answered with any other non-success status.
    #[error("GET {url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// Connection, TLS or timeout failure.
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}
