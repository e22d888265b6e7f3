//! Effective project model
//!
//! The composed, merged view of a descriptor hierarchy. Built once per
//! composition call and not mutated afterwards, with one exception: resolved
//! artifact paths are attached after the external resolver runs. Aggregator
//! projects never carry resolved artifacts; only leaf projects do.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::coordinate::Coordinate;
use super::dependency::Dependency;

/// Merged build configuration for one project in the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveProject {
    pub coordinate: Coordinate,
    pub version: String,
    pub packaging: String,

    /// Path of the descriptor this project was composed from
    pub descriptor: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Coordinate>,

    /// Child projects, in module declaration order; non-empty only for aggregators
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EffectiveProject>,

    /// Merged properties (child keys override parent on collision)
    pub properties: BTreeMap<String, String>,

    /// Deduplicated dependencies with literal versions, first-seen order
    pub dependencies: Vec<Dependency>,

    /// Merged repository map, name -> URL
    pub repositories: BTreeMap<String, String>,

    pub compiler_options: Vec<String>,

    pub manifest_entries: Vec<(String, String)>,

    /// Resolved local artifact paths, resolver order; attached after
    /// resolution, never present on aggregators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<PathBuf>>,
}

impl EffectiveProject {
    pub fn is_aggregator(&self) -> bool {
        !self.children.is_empty()
    }

    /// Directory containing this project's descriptor
    pub fn dir(&self) -> &Path {
        self.descriptor.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Attaches resolver output. The resolver runs exactly once per leaf
    /// project, so a second attachment indicates a controller bug.
    pub fn attach_artifacts(&mut self, artifacts: Vec<PathBuf>) {
        debug_assert!(!self.is_aggregator());
        debug_assert!(self.artifacts.is_none());
        self.artifacts = Some(artifacts);
    }

    /// Archive file name: `<artifact>-<version>.<packaging>`
    pub fn archive_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.coordinate.artifact(),
            self.version,
            self.packaging
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> EffectiveProject {
        EffectiveProject {
            coordinate: Coordinate::new("com.example", "app"),
            version: "1.2.3".to_string(),
            packaging: "jar".to_string(),
            descriptor: PathBuf::from("/work/app/project.toml"),
            parent: None,
            children: vec![],
            properties: BTreeMap::new(),
            dependencies: vec![],
            repositories: BTreeMap::new(),
            compiler_options: vec![],
            manifest_entries: vec![],
            artifacts: None,
        }
    }

    #[test]
    fn archive_name_uses_artifact_version_packaging() {
        assert_eq!(leaf().archive_name(), "app-1.2.3.jar");
    }

    #[test]
    fn dir_strips_descriptor_file_name() {
        assert_eq!(leaf().dir(), Path::new("/work/app"));
    }

    #[test]
    fn attach_artifacts_stores_paths_in_order() {
        let mut project = leaf();
        project.attach_artifacts(vec![PathBuf::from("/repo/a.jar"), PathBuf::from("/repo/b.jar")]);

        let artifacts = project.artifacts.as_ref().unwrap();
        assert_eq!(artifacts[0], PathBuf::from("/repo/a.jar"));
        assert_eq!(artifacts[1], PathBuf::from("/repo/b.jar"));
    }
}
