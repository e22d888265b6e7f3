//! Raw descriptor model
//!
//! `RawModel` is the direct, unmerged content of a single descriptor file as
//! a `DescriptorReader` produces it. It is ephemeral: re-read from disk on
//! every composition, never cached across calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::coordinate::Coordinate;
use super::dependency::DependencySpec;

fn default_packaging() -> String {
    "jar".to_string()
}

/// Reference to a parent descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group.clone(), self.artifact.clone())
    }
}

/// Unmerged content of one descriptor file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawModel {
    pub group: String,
    pub artifact: String,
    pub version: String,

    #[serde(default = "default_packaging")]
    pub packaging: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    /// Module names, in declaration order; non-empty selects aggregator mode
    #[serde(default)]
    pub modules: Vec<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,

    /// Repository name -> URL
    #[serde(default)]
    pub repositories: BTreeMap<String, String>,

    /// Flat option list handed to the compiler collaborator
    #[serde(default)]
    pub compiler_options: Vec<String>,

    /// User-declared manifest entries, merged over the baseline at packaging
    #[serde(default)]
    pub manifest_entries: Vec<(String, String)>,
}

impl RawModel {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group.clone(), self.artifact.clone())
    }

    pub fn is_aggregator(&self) -> bool {
        !self.modules.is_empty()
    }
}
