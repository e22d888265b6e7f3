//! Fixed project layout
//!
//! The directory layout is convention, not configuration: sources under
//! `src/main/java`, resources under `src/main/resources`, build output under
//! `target`, compiled units under `target/classes`.

use std::path::{Path, PathBuf};

/// File extension of compilable sources
pub const SOURCE_EXTENSION: &str = "java";

/// File extension of compiled units
pub const UNIT_EXTENSION: &str = "class";

/// Conventional directory layout rooted at a project directory
#[derive(Debug, Clone)]
pub struct Layout {
    project_dir: PathBuf,
}

impl Layout {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn sources(&self) -> PathBuf {
        self.project_dir.join("src").join("main").join("java")
    }

    pub fn resources(&self) -> PathBuf {
        self.project_dir.join("src").join("main").join("resources")
    }

    pub fn target(&self) -> PathBuf {
        self.project_dir.join("target")
    }

    pub fn classes(&self) -> PathBuf {
        self.target().join("classes")
    }

    /// Expected compiled output of a source file: the source-root prefix is
    /// replaced with the classes directory and the source suffix with the
    /// compiled-unit suffix. Returns `None` for paths outside the source root.
    pub fn expected_output(&self, source: &Path) -> Option<PathBuf> {
        let relative = source.strip_prefix(self.sources()).ok()?;
        Some(self.classes().join(relative.with_extension(UNIT_EXTENSION)))
    }
}
