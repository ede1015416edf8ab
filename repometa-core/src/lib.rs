//! repometa core library: domain types, record store persistence, front-matter
//! documents, person directory, site layout.
//!
//! - [`types`]: [`RepoRecord`], [`Field`] and friends
//! - [`store`]: load / save the record store
//! - [`document`]: front-matter parse / render
//! - [`people`]: GitHub login → person name
//! - [`layout`]: site paths and organization config
//! - [`error`]: [`CoreError`]

pub mod document;
pub mod error;
pub mod layout;
pub mod people;
pub mod store;
pub mod types;

pub use document::{Document, FrontMatterError};
pub use error::CoreError;
pub use layout::SiteLayout;
pub use people::PersonDirectory;
pub use store::RecordStore;
pub use types::{Field, FieldValue, RepoKey, RepoRecord, UnknownField};
