//! # repometa-sync
//!
//! Store reconciliation and document projection.
//!
//! - [`reconcile`] refreshes stale records from a [`RepoSource`](repometa_github::RepoSource)
//! - [`project`] writes cached records into software front-matter
//! - [`diff`] previews what [`project`] would change
//! - [`scaffold`] creates stub documents for popular repositories

pub mod diff;
pub mod error;
pub mod project;
pub mod reconcile;
pub mod scaffold;
pub mod staleness;
pub mod writer;

pub use diff::{diff_documents, FileDiff};
pub use error::SyncError;
pub use project::{
    derive_top_level, extract_external, project, project_all, ProjectInputs, ProjectSummary,
    Projection,
};
pub use reconcile::{
    refresh_all, refresh_org, FieldSelection, OrgOutcome, ReconcileOptions,
};
pub use scaffold::{scaffold_all, ScaffoldOptions, ScaffoldOutcome, ScaffoldStatus};
pub use staleness::{should_refresh, should_refresh_at, Staleness};
