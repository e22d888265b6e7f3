//! Subprocess compiler adapter
//!
//! Invokes an external compiler executable (`javac` by default) with the
//! project options, classpath, output directory, and the stale source set.
//! A non-zero exit is surfaced verbatim as the compiler's stderr.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use super::{CompileError, Compiler};

/// Compiler collaborator backed by an external toolchain executable
#[derive(Debug, Clone)]
pub struct ToolchainCompiler {
    program: String,
}

impl ToolchainCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Reported toolchain version, used for the baseline manifest
    pub fn version(&self) -> String {
        Command::new(&self.program)
            .arg("-version")
            .output()
            .ok()
            .map(|out| {
                // javac prints its version to stdout on modern releases and
                // to stderr on older ones
                let text = if out.stdout.is_empty() {
                    out.stderr
                } else {
                    out.stdout
                };
                String::from_utf8_lossy(&text).trim().to_string()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl Default for ToolchainCompiler {
    fn default() -> Self {
        Self::new("javac")
    }
}

impl Compiler for ToolchainCompiler {
    fn compile(
        &self,
        sources: &[PathBuf],
        classpath: &str,
        out_dir: &Path,
        options: &[String],
    ) -> Result<(), CompileError> {
        let output = Command::new(&self.program)
            .args(options)
            .arg("-classpath")
            .arg(classpath)
            .arg("-d")
            .arg(out_dir)
            .args(sources)
            .output()
            .map_err(|source| CompileError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CompileError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_toolchain_is_launch_error() {
        let compiler = ToolchainCompiler::new("definitely-not-a-compiler");
        let result = compiler.compile(
            &[PathBuf::from("A.java")],
            "",
            Path::new("/tmp/out"),
            &[],
        );

        assert!(matches!(result, Err(CompileError::Launch { .. })));
    }

    #[test]
    fn missing_toolchain_version_is_unknown() {
        let compiler = ToolchainCompiler::new("definitely-not-a-compiler");
        assert_eq!(compiler.version(), "unknown");
    }

    #[cfg(unix)]
    #[test]
    fn failing_toolchain_surfaces_stderr() {
        // `false` exits non-zero with empty output on every Unix
        let compiler = ToolchainCompiler::new("false");
        let result = compiler.compile(
            &[PathBuf::from("A.java")],
            "",
            Path::new("/tmp/out"),
            &[],
        );

        assert!(matches!(result, Err(CompileError::Failed { .. })));
    }
}
