//! Front-matter documents: a YAML header between `---` marker lines followed
//! by an opaque body.
//!
//! Parsing splits on `\n`. The header starts when the first line is `---`
//! (surrounding whitespace ignored) and ends at the next `---` line. The body
//! is everything after the closing marker, kept byte-for-byte.
//!
//! Rendering always produces `---\n<yaml>\n---\n<body>`. `serde_yaml` keeps
//! mapping order and never emits anchors or aliases, so every value is written
//! out in full.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::error::CoreError;

const MARKER: &str = "---";

/// Why a document could not be split into header and body.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    /// No opening marker, or no closing marker.
    #[error("no front-matter block")]
    Missing,

    /// The header is not valid YAML.
    #[error("invalid YAML in front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The header parsed, but is not a key/value mapping.
    #[error("front-matter is not a mapping")]
    NotAMapping,
}

/// A parsed front-matter document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: Mapping,
    pub body: String,
}

impl Document {
    pub fn new(header: Mapping, body: impl Into<String>) -> Self {
        Self {
            header,
            body: body.into(),
        }
    }

    /// Split `content` into header and body.
    pub fn parse(content: &str) -> Result<Self, FrontMatterError> {
        let lines: Vec<&str> = content.split('\n').collect();
        if lines.first().map(|l| l.trim()) != Some(MARKER) {
            return Err(FrontMatterError::Missing);
        }
        let end = lines
            .iter()
            .skip(1)
            .position(|l| l.trim() == MARKER)
            .map(|i| i + 1)
            .ok_or(FrontMatterError::Missing)?;

        let yaml = lines[1..end].join("\n");
        if yaml.trim().is_empty() {
            return Ok(Self {
                header: Mapping::new(),
                body: lines[end + 1..].join("\n"),
            });
        }
        let header = match serde_yaml::from_str::<Value>(&yaml)? {
            Value::Null => Mapping::new(),
            Value::Mapping(map) => map,
            _ => return Err(FrontMatterError::NotAMapping),
        };
        let body = lines[end + 1..].join("\n");
        Ok(Self { header, body })
    }

    /// Render back to file content.
    pub fn render(&self) -> Result<String, CoreError> {
        let yaml = if self.header.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.header)?
        };
        Ok(format!(
            "{MARKER}\n{}\n{MARKER}\n{}",
            yaml.trim_end_matches('\n'),
            self.body
        ))
    }

    /// String value of a top-level header key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.header.get(key).and_then(Value::as_str)
    }

    /// Top-level header value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.header.get(key)
    }
}
