//! Incremental build planning
//!
//! Computes the stale-source set by comparing modification times against the
//! expected compiled outputs, and assembles the ordered classpath. Nothing
//! is cached: every call re-reads live filesystem timestamps, so a plan is
//! only as fresh as the moment it was computed.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use super::layout::{Layout, SOURCE_EXTENSION};
use crate::domain::EffectiveProject;

/// Host path-list separator used when joining classpath segments
pub const CLASSPATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Source tree not found: {0}")]
    MissingSources(PathBuf),

    #[error("Failed to scan source tree: {0}")]
    Io(#[from] io::Error),
}

/// One compile step's worth of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Sources newer than their expected output; unordered
    pub stale: HashSet<PathBuf>,

    /// Resolved artifact paths in resolver order, then the classes directory
    pub classpath: String,
}

impl BuildPlan {
    pub fn is_up_to_date(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Plans the compile step for a leaf project.
///
/// The project's resolved artifacts must already be attached; an aggregator
/// or an unresolved project contributes an artifact-less classpath.
pub fn plan(project: &EffectiveProject, layout: &Layout) -> Result<BuildPlan, PlanError> {
    let sources_root = layout.sources();
    if !sources_root.is_dir() {
        return Err(PlanError::MissingSources(sources_root));
    }

    let mut stale = HashSet::new();
    collect_stale(&sources_root, layout, &mut stale)?;

    Ok(BuildPlan {
        stale,
        classpath: classpath(project, layout),
    })
}

/// Ordered join of artifact paths followed by the project's own output directory
fn classpath(project: &EffectiveProject, layout: &Layout) -> String {
    let mut segments: Vec<String> = project
        .artifacts
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    segments.push(layout.classes().display().to_string());

    let separator = CLASSPATH_SEPARATOR.to_string();
    segments.join(&separator)
}

fn collect_stale(dir: &Path, layout: &Layout, stale: &mut HashSet<PathBuf>) -> Result<(), PlanError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_stale(&path, layout, stale)?;
            continue;
        }

        let is_source = path
            .extension()
            .map(|ext| ext == SOURCE_EXTENSION)
            .unwrap_or(false);
        if !is_source {
            continue;
        }

        let Some(output) = layout.expected_output(&path) else {
            continue;
        };

        if modified(&path)? > output_mtime(&output) {
            stale.insert(path);
        }
    }

    Ok(())
}

fn modified(path: &Path) -> Result<SystemTime, PlanError> {
    Ok(fs::metadata(path)?.modified()?)
}

/// A missing output counts as modification time zero, so any existing source
/// is stale against it
fn output_mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use filetime_helpers::set_older;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    // Timestamp juggling without a dev-dependency: rewrite the source file
    // after the output so the source is strictly newer, or vice versa.
    mod filetime_helpers {
        use std::fs;
        use std::path::Path;
        use std::thread::sleep;
        use std::time::Duration;

        /// Rewrites `newer` after a delay so its mtime strictly exceeds
        /// `older`'s on filesystems with coarse timestamps
        pub fn set_older(older: &Path, newer: &Path) {
            let newer_content = fs::read(newer).unwrap();
            sleep(Duration::from_millis(20));
            fs::write(newer, newer_content).unwrap();
            // Sanity: strictly ordered
            let older_m = fs::metadata(older).unwrap().modified().unwrap();
            let newer_m = fs::metadata(newer).unwrap().modified().unwrap();
            assert!(newer_m > older_m, "timestamps not strictly ordered");
        }
    }

    fn project(dir: &TempDir) -> EffectiveProject {
        EffectiveProject {
            coordinate: Coordinate::new("com.example", "app"),
            version: "1.0".to_string(),
            packaging: "jar".to_string(),
            descriptor: dir.path().join("project.toml"),
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

    fn write_source(layout: &Layout, relative: &str) -> PathBuf {
        let path = layout.sources().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "class A {}").unwrap();
        path
    }

    fn write_output(layout: &Layout, relative: &str) -> PathBuf {
        let path = layout.classes().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"\xca\xfe\xba\xbe").unwrap();
        path
    }

    #[test]
    fn source_without_output_is_stale() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let source = write_source(&layout, "com/example/Main.java");

        let plan = plan(&project(&dir), &layout).unwrap();

        assert!(plan.stale.contains(&source));
        assert!(!plan.is_up_to_date());
    }

    #[test]
    fn source_newer_than_output_is_stale() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let source = write_source(&layout, "com/example/Main.java");
        let output = write_output(&layout, "com/example/Main.class");
        set_older(&output, &source);

        let plan = plan(&project(&dir), &layout).unwrap();
        assert!(plan.stale.contains(&source));
    }

    #[test]
    fn source_older_than_output_is_excluded() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let source = write_source(&layout, "com/example/Main.java");
        let output = write_output(&layout, "com/example/Main.class");
        set_older(&source, &output);

        let plan = plan(&project(&dir), &layout).unwrap();
        assert!(plan.is_up_to_date());
    }

    #[test]
    fn non_source_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let path = layout.sources().join("notes.txt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not a source").unwrap();

        let plan = plan(&project(&dir), &layout).unwrap();
        assert!(plan.is_up_to_date());
    }

    #[test]
    fn missing_source_tree_is_an_error() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());

        let result = plan(&project(&dir), &layout);
        assert!(matches!(result, Err(PlanError::MissingSources(_))));
    }

    #[test]
    fn classpath_lists_artifacts_then_classes_dir() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        write_source(&layout, "A.java");

        let mut p = project(&dir);
        p.attach_artifacts(vec![PathBuf::from("/repo/a.jar"), PathBuf::from("/repo/b.jar")]);

        let plan = plan(&p, &layout).unwrap();
        let expected = format!(
            "/repo/a.jar{sep}/repo/b.jar{sep}{classes}",
            sep = CLASSPATH_SEPARATOR,
            classes = layout.classes().display()
        );
        assert_eq!(plan.classpath, expected);
    }
}
