//! Dependency declarations and resolved dependencies
//!
//! `DependencySpec` is what a descriptor declares: its version may be a
//! literal or a `${name}` property reference. `Dependency` is the composed
//! form with a literal (expanded) version. Identity is the full
//! (coordinate, version, scope, extension, classifier) tuple; when the same
//! tuple appears twice in a merged list, the first occurrence wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coordinate::Coordinate;

/// Dependency scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
        }
    }
}

fn default_extension() -> String {
    "jar".to_string()
}

/// A dependency as declared in a descriptor (version may be a property reference)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub group: String,
    pub artifact: String,

    /// Literal version or a `${name}` reference expanded during composition
    pub version: String,

    #[serde(default)]
    pub scope: Scope,

    /// Artifact extension, named `type` in descriptors
    #[serde(rename = "type", default = "default_extension")]
    pub extension: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl DependencySpec {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group.clone(), self.artifact.clone())
    }

    /// Builds the composed dependency with the given literal version
    pub fn with_version(&self, version: String) -> Dependency {
        Dependency {
            coordinate: self.coordinate(),
            version,
            scope: self.scope,
            extension: self.extension.clone(),
            classifier: self.classifier.clone(),
        }
    }
}

/// A composed dependency with a literal version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub coordinate: Coordinate,
    pub version: String,
    pub scope: Scope,
    pub extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl Dependency {
    /// File name of the artifact in a repository layout
    /// (`lib-1.2.jar`, `lib-1.2-sources.jar`)
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "{}-{}-{}.{}",
                self.coordinate.artifact(),
                self.version,
                c,
                self.extension
            ),
            None => format!(
                "{}-{}.{}",
                self.coordinate.artifact(),
                self.version,
                self.extension
            ),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.coordinate,
            self.version,
            self.scope.as_str()
        )
    }
}

/// Deduplicates a dependency list, keeping the first occurrence of each
/// identical (coordinate, version, scope, extension, classifier) tuple
pub fn dedup_first_seen(deps: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::with_capacity(deps.len());

    for dep in deps {
        if seen.insert(dep.clone()) {
            result.push(dep);
        }
    }

    result
}
