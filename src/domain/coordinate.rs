//! Artifact coordinates
//!
//! A coordinate identifies a publishable artifact by namespace and name:
//! `com.example:app`. The version lives alongside the coordinate in the
//! model types rather than inside it, because a dependency may declare its
//! version as a property reference that is only expanded during composition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Invalid coordinate: expected 'group:artifact', got '{0}'")]
    InvalidFormat(String),

    #[error("Coordinate has an empty {0} segment")]
    EmptySegment(&'static str),
}

/// Namespace + name pair identifying an artifact (`group:artifact`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    group: String,
    artifact: String,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Returns the namespace segment (e.g. `com.example`)
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the name segment after the namespace separator
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Returns the group as a relative directory path (`com.example` -> `com/example`)
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (group, artifact) = s
            .split_once(':')
            .ok_or_else(|| CoordinateError::InvalidFormat(s.to_string()))?;

        if group.is_empty() {
            return Err(CoordinateError::EmptySegment("group"));
        }
        if artifact.is_empty() || artifact.contains(':') {
            return Err(CoordinateError::InvalidFormat(s.to_string()));
        }

        Ok(Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
        })
    }
}

impl TryFrom<String> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(c: Coordinate) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_parses_group_and_artifact() {
        let c: Coordinate = "com.example:app".parse().unwrap();
        assert_eq!(c.group(), "com.example");
        assert_eq!(c.artifact(), "app");
    }

    #[test]
    fn coordinate_roundtrips_through_display() {
        let original = Coordinate::new("org.lib", "core");
        let parsed: Coordinate = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn coordinate_rejects_invalid_format() {
        assert!("noseparator".parse::<Coordinate>().is_err());
        assert!(":artifact".parse::<Coordinate>().is_err());
        assert!("group:".parse::<Coordinate>().is_err());
        assert!("a:b:c".parse::<Coordinate>().is_err());
    }

    #[test]
    fn group_path_replaces_dots() {
        let c = Coordinate::new("com.example.deep", "app");
        assert_eq!(c.group_path(), "com/example/deep");
    }

    #[test]
    fn serde_roundtrip_uses_string_form() {
        let original = Coordinate::new("com.example", "app");
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, "\"com.example:app\"");
        let parsed: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }
}
