//! External collaborator seams
//!
//! The core treats descriptor parsing, transitive dependency resolution,
//! compiler invocation, and artifact publishing as black boxes behind these
//! traits. One concrete adapter per trait ships with the crate so the CLI
//! works end-to-end; library users can substitute their own.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{Coordinate, Dependency, RawModel};

mod local_repo;
mod toml_reader;
mod toolchain;

pub use local_repo::LocalRepository;
pub use toml_reader::{TomlReader, DESCRIPTOR_NAME};
pub use toolchain::ToolchainCompiler;

/// Descriptor is missing or malformed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Descriptor not found: {0}")]
    Missing(PathBuf),

    #[error("Malformed descriptor {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Failed to read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// External resolver failure; fatal, never retried
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Artifact not found: {dependency} (looked at {path})")]
    Missing { dependency: String, path: PathBuf },

    #[error("Resolver failed for {dependency}: {message}")]
    Failed { dependency: String, message: String },
}

/// External compiler reported failure, surfaced verbatim
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Failed to launch compiler '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Compilation failed:\n{stderr}")]
    Failed { stderr: String },
}

/// External publish failure
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to publish {coordinate}: {message}")]
    Failed { coordinate: String, message: String },

    #[error("Install I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Parses one descriptor file into a `RawModel`.
///
/// Implementations read the file fresh on every call; the core never caches
/// the result across compositions.
pub trait DescriptorReader {
    fn read(&self, path: &Path) -> Result<RawModel, ParseError>;
}

/// Transitive dependency resolution.
///
/// Returns one resolved local file path per input dependency, in input
/// order. The conflict-resolution policy is the implementation's own
/// business. Invoked exactly once per non-aggregator project; any failure
/// is fatal with no partial state retained.
pub trait DependencyResolver {
    fn resolve(
        &self,
        dependencies: &[Dependency],
        repositories: &BTreeMap<String, String>,
    ) -> Result<Vec<PathBuf>, ResolutionError>;
}

/// Compiler invocation.
///
/// Never called with an empty source list; the planner short-circuits an
/// empty stale set before reaching this seam.
pub trait Compiler {
    fn compile(
        &self,
        sources: &[PathBuf],
        classpath: &str,
        out_dir: &Path,
        options: &[String],
    ) -> Result<(), CompileError>;
}

/// Side-effecting publish of a built artifact
pub trait Installer {
    fn install(
        &self,
        coordinate: &Coordinate,
        version: &str,
        archive: &Path,
        descriptor: &Path,
    ) -> Result<(), InstallError>;
}
