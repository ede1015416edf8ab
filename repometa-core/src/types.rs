//! Domain types for cached repository metadata.
//!
//! A [`RepoRecord`] is what one `[[repos]]` entry of the data file holds.
//! Every attribute except the key is optional; absent attributes are never
//! written because TOML has no null.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// `owner/name` identifier of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoKey(pub String);

impl RepoKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A fetchable attribute of a repository record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Description,
    Website,
    Stars,
    Forks,
    License,
    Language,
    LatestRelease,
    Releases,
    FirstCommit,
    Contributors,
    ReadmeImage,
}

impl Field {
    /// Every fetchable field, in data-file order.
    pub const ALL: [Field; 12] = [
        Field::Name,
        Field::Description,
        Field::Website,
        Field::Stars,
        Field::Forks,
        Field::License,
        Field::Language,
        Field::LatestRelease,
        Field::Releases,
        Field::FirstCommit,
        Field::Contributors,
        Field::ReadmeImage,
    ];

    /// Fields served by the organization listing without extra API calls.
    pub const BASIC: [Field; 8] = [
        Field::Name,
        Field::Description,
        Field::Website,
        Field::Stars,
        Field::Forks,
        Field::License,
        Field::FirstCommit,
        Field::Language,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Website => "website",
            Field::Stars => "stars",
            Field::Forks => "forks",
            Field::License => "license",
            Field::Language => "language",
            Field::LatestRelease => "latest_release",
            Field::Releases => "releases",
            Field::FirstCommit => "first_commit",
            Field::Contributors => "contributors",
            Field::ReadmeImage => "readme_image",
        }
    }

    /// Comma-separated, sorted list of valid field names (for messages).
    pub fn valid_names() -> String {
        let mut names: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field name that is not one of [`Field::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}

/// A freshly fetched value for one [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Count(u64),
    List(Vec<String>),
}

impl FieldValue {
    fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn into_count(self) -> Option<u64> {
        match self {
            FieldValue::Count(n) => Some(n),
            _ => None,
        }
    }

    fn into_list(self) -> Option<Vec<String>> {
        match self {
            FieldValue::List(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Count(n) => write!(f, "{n}"),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Cached metadata snapshot for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub repo: RepoKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub releases: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_image: Option<String>,
    /// RFC 3339 time of the last refresh, kept verbatim so that a corrupt
    /// value survives until the next refresh replaces it. A bare TOML datetime
    /// or any other scalar is read back as its text.
    #[serde(
        default,
        deserialize_with = "timestamp_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
    /// Keys this tool does not manage, carried through unchanged.
    #[serde(flatten, default, skip_serializing_if = "toml::Table::is_empty")]
    pub extra: toml::Table,
}

fn timestamp_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<toml::Value>::deserialize(deserializer)?.map(|value| match value {
        toml::Value::String(text) => text,
        other => other.to_string(),
    }))
}

impl RepoRecord {
    /// An empty record carrying only its key.
    pub fn new(repo: impl Into<RepoKey>) -> Self {
        Self {
            repo: repo.into(),
            name: None,
            description: None,
            website: None,
            stars: None,
            forks: None,
            latest_release: None,
            releases: None,
            first_commit: None,
            license: None,
            language: None,
            contributors: None,
            readme_image: None,
            last_updated: None,
            extra: toml::Table::new(),
        }
    }

    /// Current value of `field`, if any.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Name => self.name.clone().map(FieldValue::Text),
            Field::Description => self.description.clone().map(FieldValue::Text),
            Field::Website => self.website.clone().map(FieldValue::Text),
            Field::Stars => self.stars.map(FieldValue::Count),
            Field::Forks => self.forks.map(FieldValue::Count),
            Field::License => self.license.clone().map(FieldValue::Text),
            Field::Language => self.language.clone().map(FieldValue::Text),
            Field::LatestRelease => self.latest_release.clone().map(FieldValue::Text),
            Field::Releases => self.releases.map(FieldValue::Count),
            Field::FirstCommit => self.first_commit.clone().map(FieldValue::Text),
            Field::Contributors => self.contributors.clone().map(FieldValue::List),
            Field::ReadmeImage => self.readme_image.clone().map(FieldValue::Text),
        }
    }

    /// Overwrite `field`. `None`, or a value of the wrong shape, clears it.
    pub fn set(&mut self, field: Field, value: Option<FieldValue>) {
        match field {
            Field::Name => self.name = value.and_then(FieldValue::into_text),
            Field::Description => self.description = value.and_then(FieldValue::into_text),
            Field::Website => self.website = value.and_then(FieldValue::into_text),
            Field::Stars => self.stars = value.and_then(FieldValue::into_count),
            Field::Forks => self.forks = value.and_then(FieldValue::into_count),
            Field::License => self.license = value.and_then(FieldValue::into_text),
            Field::Language => self.language = value.and_then(FieldValue::into_text),
            Field::LatestRelease => self.latest_release = value.and_then(FieldValue::into_text),
            Field::Releases => self.releases = value.and_then(FieldValue::into_count),
            Field::FirstCommit => self.first_commit = value.and_then(FieldValue::into_text),
            Field::Contributors => self.contributors = value.and_then(FieldValue::into_list),
            Field::ReadmeImage => self.readme_image = value.and_then(FieldValue::into_text),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
