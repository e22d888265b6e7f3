//! TOML descriptor reader
//!
//! Parses a `project.toml` descriptor into a `RawModel`. Only the sections
//! the core consumes are deserialized (`project`, `parent`, `properties`,
//! `dependencies`, `repositories`, and the compiler/manifest build tables);
//! everything else in the file is ignored. The module list lives inside
//! `[project]`: a bare top-level `modules` key written after any table
//! header would bind to that table in TOML and never reach the model.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{DescriptorReader, ParseError};
use crate::domain::{DependencySpec, ParentRef, RawModel};

/// Fixed descriptor file name within a project directory
pub const DESCRIPTOR_NAME: &str = "project.toml";

#[derive(Debug, Deserialize)]
struct Descriptor {
    project: ProjectSection,

    parent: Option<ParentRef>,

    #[serde(default)]
    properties: BTreeMap<String, String>,

    #[serde(default)]
    dependencies: Vec<DependencySpec>,

    #[serde(default)]
    repositories: BTreeMap<String, String>,

    #[serde(default)]
    build: BuildSection,
}

#[derive(Debug, Deserialize)]
struct ProjectSection {
    group: String,
    artifact: String,
    version: String,

    #[serde(default = "default_packaging")]
    packaging: String,

    /// Module directories, in declaration order; non-empty selects
    /// aggregator mode
    #[serde(default)]
    modules: Vec<String>,
}

fn default_packaging() -> String {
    "jar".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct BuildSection {
    #[serde(default)]
    compiler: CompilerSection,

    /// Manifest entry table; TOML table order is not preserved, entries are
    /// carried in key order
    #[serde(default)]
    manifest: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompilerSection {
    #[serde(default)]
    options: Vec<String>,
}

/// Descriptor reader backed by `project.toml` files
#[derive(Debug, Default)]
pub struct TomlReader;

impl TomlReader {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorReader for TomlReader {
    fn read(&self, path: &Path) -> Result<RawModel, ParseError> {
        if !path.is_file() {
            return Err(ParseError::Missing(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let descriptor: Descriptor =
            toml::from_str(&content).map_err(|e| ParseError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(RawModel {
            group: descriptor.project.group,
            artifact: descriptor.project.artifact,
            version: descriptor.project.version,
            packaging: descriptor.project.packaging,
            parent: descriptor.parent,
            modules: descriptor.project.modules,
            properties: descriptor.properties,
            dependencies: descriptor.dependencies,
            repositories: descriptor.repositories,
            compiler_options: descriptor.build.compiler.options,
            manifest_entries: descriptor.build.manifest.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scope;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_descriptor(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(DESCRIPTOR_NAME);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_full_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0.0"

[parent]
group = "com.example"
artifact = "parent"
version = "1.0.0"

[properties]
"lib.version" = "2.3"

[[dependencies]]
group = "org.lib"
artifact = "core"
version = "${lib.version}"
scope = "test"

[repositories]
central = "https://repo.example.com"

[build.compiler]
options = ["-source", "8"]

[build.manifest]
"Main-Class" = "com.example.Main"
"#,
        );

        let model = TomlReader::new().read(&path).unwrap();

        assert_eq!(model.coordinate().to_string(), "com.example:app");
        assert_eq!(model.version, "1.0.0");
        assert_eq!(model.packaging, "jar");
        assert_eq!(model.parent.as_ref().unwrap().artifact, "parent");
        assert_eq!(model.properties["lib.version"], "2.3");
        assert_eq!(model.dependencies[0].version, "${lib.version}");
        assert_eq!(model.dependencies[0].scope, Scope::Test);
        assert_eq!(model.repositories["central"], "https://repo.example.com");
        assert_eq!(model.compiler_options, vec!["-source", "8"]);
        assert_eq!(
            model.manifest_entries,
            vec![("Main-Class".to_string(), "com.example.Main".to_string())]
        );
    }

    #[test]
    fn missing_descriptor_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let result = TomlReader::new().read(&dir.path().join(DESCRIPTOR_NAME));

        assert!(matches!(result, Err(ParseError::Missing(_))));
    }

    #[test]
    fn malformed_descriptor_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, "not valid toml [");

        let result = TomlReader::new().read(&path);
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn module_list_in_project_section_selects_aggregator() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            r#"
[project]
group = "com.example"
artifact = "aggregate"
version = "1.0.0"
modules = ["core", "web"]

[properties]
"shared.version" = "3.0"
"#,
        );

        let model = TomlReader::new().read(&path).unwrap();
        assert!(model.is_aggregator());
        assert_eq!(model.modules, vec!["core", "web"]);
    }

    #[test]
    fn module_list_outside_project_section_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0.0"

[parent]
group = "com.example"
artifact = "parent"
version = "1.0.0"
modules = ["core"]
"#,
        );

        // The stray key binds to the preceding table and never reaches the
        // model; the descriptor stays in child mode
        let model = TomlReader::new().read(&path).unwrap();
        assert!(!model.is_aggregator());
        assert!(model.parent.is_some());
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(
            &dir,
            r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0.0"

[unknown]
key = "value"
"#,
        );

        let model = TomlReader::new().read(&path).unwrap();
        assert_eq!(model.artifact, "app");
        assert!(model.dependencies.is_empty());
    }
}
