//! # repometa-github
//!
//! Read-only access to GitHub repository metadata.
//!
//! [`GithubClient`] talks to the REST API; [`FakeSource`] serves canned data
//! in tests. Both implement [`RepoSource`], which is all the reconciler sees.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use repometa_core::Field;
//! use repometa_github::{FieldFetcher, GithubClient, RepoSource};
//!
//! fn stars_of(org: &str) -> Result<(), repometa_github::GithubError> {
//!     let client = GithubClient::from_env()?;
//!     for repo in client.org_repos(org)? {
//!         let stars = FieldFetcher::new(&client, &repo).fetch(Field::Stars)?;
//!         println!("{}: {:?}", repo.full_name, stars);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod fake;
pub mod fetch;
pub mod readme;
pub mod source;
pub mod types;

pub use client::GithubClient;
pub use error::GithubError;
pub use fake::FakeSource;
pub use fetch::{format_timestamp, FieldFetcher};
pub use source::RepoSource;
pub use types::{LicenseInfo, RateLimit, ReleaseInfo, RepoHandle};
