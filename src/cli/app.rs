//! Main CLI application structure

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use crate::archive::ManifestConfig;
use crate::compose::Composer;
use crate::external::{LocalRepository, TomlReader, ToolchainCompiler, DESCRIPTOR_NAME};
use crate::lifecycle::Lifecycle;

#[derive(Parser)]
#[command(name = "mason")]
#[command(author, version, about = "Fast in-process incremental builds for descriptor-based projects")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project directory containing the descriptor
    #[arg(long, short = 'C', global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Local repository root (defaults to the per-user repository)
    #[arg(long, global = true, env = "MASON_REPOSITORY")]
    pub repo: Option<PathBuf>,

    /// Compiler executable
    #[arg(long, global = true, default_value = "javac", env = "MASON_COMPILER")]
    pub compiler: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the composed effective project
    Show,

    /// Delete the build output directory
    Clean,

    /// Compile stale sources incrementally
    Compile,

    /// Compile, then assemble the distributable archive
    Package,

    /// Compile, package, then publish to the local repository
    Install,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let descriptor = cli.dir.join(DESCRIPTOR_NAME);
    output.verbose_ctx("compose", &format!("Reading {}", descriptor.display()));

    let reader = TomlReader::new();
    let composer = Composer::new(&reader);
    let project = composer.compose(&descriptor, &BTreeMap::new())?;

    output.verbose_ctx(
        "compose",
        &format!(
            "Composed {} ({} dependencies, {} modules)",
            project.coordinate,
            project.dependencies.len(),
            project.children.len()
        ),
    );

    if let Commands::Show = cli.command {
        output.data(&project);
        return Ok(());
    }

    let repository = match &cli.repo {
        Some(root) => LocalRepository::new(root),
        None => LocalRepository::default_location()
            .context("Could not determine the default repository location")?,
    };
    output.verbose_ctx(
        "repo",
        &format!("Using repository at {}", repository.root().display()),
    );

    let compiler = ToolchainCompiler::new(&cli.compiler);
    let manifest = ManifestConfig::detect(compiler.version());
    let mut lifecycle = Lifecycle::new(project, &repository, &compiler, &repository, manifest);

    match cli.command {
        Commands::Show => unreachable!("handled before collaborators are built"),

        Commands::Clean => {
            lifecycle.clean()?;
            output.success("Cleaned build output");
        }

        Commands::Compile => {
            let compiled = lifecycle.compile()?;
            if compiled == 0 {
                output.success("Build output is up to date");
            } else {
                output.success(&format!("Compiled {} source file(s)", compiled));
            }
        }

        Commands::Package => {
            lifecycle.compile()?;
            let archives = lifecycle.package()?;
            for archive in archives {
                output.success(&format!("Packaged {}", archive.display()));
            }
        }

        Commands::Install => {
            lifecycle.compile()?;
            lifecycle.package()?;
            lifecycle.install()?;
            output.success(&format!(
                "Installed {} into {}",
                lifecycle.project().coordinate,
                repository.root().display()
            ));
        }
    }

    Ok(())
}
