//! Lifecycle controller
//!
//! Sequences clean → compile → package → install over an effective project,
//! short-circuiting on failure: a failed compile blocks package, a failed
//! package blocks install. Failure is a negative result, not a rollback:
//! partial output from an aborted step stays on disk until an explicit
//! clean.
//!
//! On an aggregator project every step runs over the children sequentially
//! in module order, fail-fast; nothing is resolved, compiled, or packaged at
//! the aggregator's own level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::archive::{assemble, ManifestConfig, PackageError};
use crate::build::{plan, Layout, PlanError};
use crate::domain::EffectiveProject;
use crate::external::{
    CompileError, Compiler, DependencyResolver, InstallError, Installer, ResolutionError,
};

/// Lifecycle progress for one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Clean,
    Compiled,
    Packaged,
    Installed,
    Failed,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Step '{step}' skipped: '{blocked_on}' did not complete")]
    Skipped {
        step: &'static str,
        blocked_on: &'static str,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error("Build I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Sequences lifecycle steps over a composed project
pub struct Lifecycle<'a> {
    project: EffectiveProject,
    resolver: &'a dyn DependencyResolver,
    compiler: &'a dyn Compiler,
    installer: &'a dyn Installer,
    manifest: ManifestConfig,
    phase: Phase,
    archives: Vec<PathBuf>,
}

impl<'a> Lifecycle<'a> {
    pub fn new(
        project: EffectiveProject,
        resolver: &'a dyn DependencyResolver,
        compiler: &'a dyn Compiler,
        installer: &'a dyn Installer,
        manifest: ManifestConfig,
    ) -> Self {
        Self {
            project,
            resolver,
            compiler,
            installer,
            manifest,
            phase: Phase::Pending,
            archives: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn project(&self) -> &EffectiveProject {
        &self.project
    }

    /// Archives produced by the last successful package step, leaf order
    pub fn archives(&self) -> &[PathBuf] {
        &self.archives
    }

    /// Recursively deletes the target directory. Symbolic-link children are
    /// deleted as links and never traversed; link cycles are unsupported.
    pub fn clean(&mut self) -> Result<(), LifecycleError> {
        match clean_tree(&self.project) {
            Ok(()) => {
                self.phase = Phase::Clean;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    /// Resolves dependencies, computes the stale set, and compiles it,
    /// returning the number of sources handed to the compiler. An empty
    /// stale set succeeds trivially without copying resources or invoking
    /// the compiler.
    pub fn compile(&mut self) -> Result<usize, LifecycleError> {
        match compile_tree(&mut self.project, self.resolver, self.compiler) {
            Ok(compiled) => {
                self.phase = Phase::Compiled;
                Ok(compiled)
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    /// Assembles the archive(s); requires a completed compile
    pub fn package(&mut self) -> Result<&[PathBuf], LifecycleError> {
        if self.phase != Phase::Compiled {
            return Err(LifecycleError::Skipped {
                step: "package",
                blocked_on: "compile",
            });
        }

        let mut archives = Vec::new();
        match package_tree(&self.project, &self.manifest, &mut archives) {
            Ok(()) => {
                self.archives = archives;
                self.phase = Phase::Packaged;
                Ok(&self.archives)
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    /// Publishes archive + descriptor + coordinate; requires a completed package
    pub fn install(&mut self) -> Result<(), LifecycleError> {
        if self.phase != Phase::Packaged {
            return Err(LifecycleError::Skipped {
                step: "install",
                blocked_on: "package",
            });
        }

        match install_tree(&self.project, self.installer) {
            Ok(()) => {
                self.phase = Phase::Installed;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }
}

fn clean_tree(project: &EffectiveProject) -> Result<(), LifecycleError> {
    let target = Layout::new(project.dir()).target();

    // remove_dir_all deletes symlinked children as links without following
    // them
    match fs::remove_dir_all(&target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    for child in &project.children {
        clean_tree(child)?;
    }

    Ok(())
}

fn compile_tree(
    project: &mut EffectiveProject,
    resolver: &dyn DependencyResolver,
    compiler: &dyn Compiler,
) -> Result<usize, LifecycleError> {
    if project.is_aggregator() {
        let mut compiled = 0;
        for child in &mut project.children {
            compiled += compile_tree(child, resolver, compiler)?;
        }
        return Ok(compiled);
    }

    let layout = Layout::new(project.dir());
    fs::create_dir_all(layout.classes())?;

    if project.artifacts.is_none() {
        let artifacts = resolver.resolve(&project.dependencies, &project.repositories)?;
        project.attach_artifacts(artifacts);
    }

    let plan = plan(project, &layout)?;
    if plan.is_up_to_date() {
        return Ok(0);
    }

    copy_resources(&layout)?;

    let sources: Vec<PathBuf> = plan.stale.into_iter().collect();
    compiler.compile(
        &sources,
        &plan.classpath,
        &layout.classes(),
        &project.compiler_options,
    )?;

    Ok(sources.len())
}

fn package_tree(
    project: &EffectiveProject,
    manifest: &ManifestConfig,
    archives: &mut Vec<PathBuf>,
) -> Result<(), LifecycleError> {
    if project.is_aggregator() {
        for child in &project.children {
            package_tree(child, manifest, archives)?;
        }
        return Ok(());
    }

    let layout = Layout::new(project.dir());
    archives.push(assemble(project, &layout, manifest)?);
    Ok(())
}

fn install_tree(
    project: &EffectiveProject,
    installer: &dyn Installer,
) -> Result<(), LifecycleError> {
    if project.is_aggregator() {
        for child in &project.children {
            install_tree(child, installer)?;
        }
        return Ok(());
    }

    let layout = Layout::new(project.dir());
    let archive = layout.target().join(project.archive_name());

    installer.install(
        &project.coordinate,
        &project.version,
        &archive,
        &project.descriptor,
    )?;

    Ok(())
}

/// Copies the resource tree into the classes directory, preserving
/// structure. A missing resource tree means there is nothing to copy.
fn copy_resources(layout: &Layout) -> Result<(), LifecycleError> {
    let resources = layout.resources();
    if !resources.is_dir() {
        return Ok(());
    }

    copy_dir(&resources, &layout.classes())
}

fn copy_dir(from: &Path, to: &Path) -> Result<(), LifecycleError> {
    fs::create_dir_all(to)?;

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let source = entry.path();
        let destination = to.join(entry.file_name());

        if source.is_dir() {
            copy_dir(&source, &destination)?;
        } else {
            fs::copy(&source, &destination)?;
        }
    }

    Ok(())
}
