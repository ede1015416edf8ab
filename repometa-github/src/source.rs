//! The remote metadata source seam.

use crate::error::GithubError;
use crate::types::{RateLimit, ReleaseInfo, RepoHandle};

/// Everything the reconciler needs from a code host.
///
/// Calls are blocking; timeouts are the implementation's business.
pub trait RepoSource {
    /// Public repositories of `org`, archived ones included.
    fn org_repos(&self, org: &str) -> Result<Vec<RepoHandle>, GithubError>;

    /// Newest release time and release count.
    fn releases(&self, repo: &RepoHandle) -> Result<ReleaseInfo, GithubError>;

    /// Contributor logins, most active first.
    fn contributors(&self, repo: &RepoHandle) -> Result<Vec<String>, GithubError>;

    /// Raw README text, `None` when the repository has none.
    fn readme(&self, repo: &RepoHandle) -> Result<Option<String>, GithubError>;

    /// Current API quota.
    fn rate_limit(&self) -> Result<RateLimit, GithubError>;
}
