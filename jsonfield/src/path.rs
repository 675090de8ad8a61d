//! Attribute paths addressing a position inside a structured attribute.
//!
//! A path is a sequence of segments joined by `->`. The first segment names the
//! top-level host attribute; every following segment is a key in the nested map
//! stored under it, e.g. `address->location->latitude`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::FieldError;

/// Delimiter between path segments.
pub const DELIMITER: &str = "->";

/// A non-empty path into a host entity's attributes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    /// Single-segment path naming a top-level attribute.
    pub fn root(attribute: impl Into<String>) -> Self {
        Self(vec![attribute.into()])
    }

    /// Parse a `->` delimited path. Empty segments are rejected.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let segments: Vec<String> = raw.split(DELIMITER).map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(FieldError::invalid_path(raw, "path segments cannot be empty"));
        }
        Ok(Self(segments))
    }

    /// Append a segment. An empty attribute adds nothing.
    pub fn child(&self, attribute: &str) -> Self {
        let mut segments = self.0.clone();
        if !attribute.is_empty() {
            segments.push(attribute.to_string());
        }
        Self(segments)
    }

    /// Name of the host attribute this path lives under.
    pub fn top_level(&self) -> &str {
        &self.0[0]
    }

    /// Segments below the top-level attribute.
    pub fn nested(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment of the path.
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Paths are never empty; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &AttributePath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(DELIMITER))
    }
}

impl FromStr for AttributePath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AttributePath {
    type Error = FieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for AttributePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AttributePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        AttributePath::parse(&raw).map_err(serde::de::Error::custom)
    }
}
