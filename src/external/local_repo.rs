//! Local repository resolver and installer
//!
//! Resolves and publishes artifacts against an on-disk repository laid out
//! as `<root>/<group as dirs>/<artifact>/<version>/<file>`. The repository
//! map handed in by the composer is accepted for interface compatibility
//! but never consulted: this adapter is strictly offline.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::{DependencyResolver, InstallError, Installer, ResolutionError};
use crate::domain::{Coordinate, Dependency};

/// Offline artifact repository rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Opens the default per-user repository (`~/.local/share/mason/repository`
    /// or the platform equivalent)
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("dev", "mason", "mason").map(|dirs| Self {
            root: dirs.data_dir().join("repository"),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository path of an artifact file for the given coordinate/version
    fn artifact_dir(&self, coordinate: &Coordinate, version: &str) -> PathBuf {
        self.root
            .join(coordinate.group_path())
            .join(coordinate.artifact())
            .join(version)
    }

    fn dependency_path(&self, dependency: &Dependency) -> PathBuf {
        self.artifact_dir(&dependency.coordinate, &dependency.version)
            .join(dependency.file_name())
    }
}

impl DependencyResolver for LocalRepository {
    fn resolve(
        &self,
        dependencies: &[Dependency],
        _repositories: &BTreeMap<String, String>,
    ) -> Result<Vec<PathBuf>, ResolutionError> {
        let mut paths = Vec::with_capacity(dependencies.len());

        for dependency in dependencies {
            let path = self.dependency_path(dependency);
            if !path.is_file() {
                return Err(ResolutionError::Missing {
                    dependency: dependency.to_string(),
                    path,
                });
            }
            paths.push(path);
        }

        Ok(paths)
    }
}

impl Installer for LocalRepository {
    fn install(
        &self,
        coordinate: &Coordinate,
        version: &str,
        archive: &Path,
        descriptor: &Path,
    ) -> Result<(), InstallError> {
        let dir = self.artifact_dir(coordinate, version);
        fs::create_dir_all(&dir)?;

        let archive_name = archive
            .file_name()
            .ok_or_else(|| InstallError::Failed {
                coordinate: coordinate.to_string(),
                message: format!("archive path has no file name: {}", archive.display()),
            })?;

        fs::copy(archive, dir.join(archive_name))?;
        fs::copy(
            descriptor,
            dir.join(format!("{}-{}.toml", coordinate.artifact(), version)),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scope;
    use tempfile::TempDir;

    fn dep(group: &str, artifact: &str, version: &str) -> Dependency {
        Dependency {
            coordinate: Coordinate::new(group, artifact),
            version: version.to_string(),
            scope: Scope::Compile,
            extension: "jar".to_string(),
            classifier: None,
        }
    }

    fn stage(repo: &LocalRepository, dependency: &Dependency) -> PathBuf {
        let path = repo.dependency_path(dependency);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"jar bytes").unwrap();
        path
    }

    #[test]
    fn resolves_staged_artifacts_in_input_order() {
        let dir = TempDir::new().unwrap();
        let repo = LocalRepository::new(dir.path());

        let a = dep("org.lib", "a", "1.0");
        let b = dep("org.lib", "b", "2.0");
        let path_a = stage(&repo, &a);
        let path_b = stage(&repo, &b);

        let resolved = repo.resolve(&[a, b], &BTreeMap::new()).unwrap();
        assert_eq!(resolved, vec![path_a, path_b]);
    }

    #[test]
    fn missing_artifact_fails_resolution() {
        let dir = TempDir::new().unwrap();
        let repo = LocalRepository::new(dir.path());

        let result = repo.resolve(&[dep("org.lib", "ghost", "1.0")], &BTreeMap::new());
        assert!(matches!(result, Err(ResolutionError::Missing { .. })));
    }

    #[test]
    fn group_maps_to_nested_directories() {
        let dir = TempDir::new().unwrap();
        let repo = LocalRepository::new(dir.path());

        let d = dep("com.example.deep", "lib", "0.1");
        let path = repo.dependency_path(&d);

        assert!(path.ends_with("com/example/deep/lib/0.1/lib-0.1.jar"));
    }

    #[test]
    fn install_copies_archive_and_descriptor() {
        let dir = TempDir::new().unwrap();
        let repo = LocalRepository::new(dir.path().join("repo"));

        let archive = dir.path().join("app-1.0.jar");
        let descriptor = dir.path().join("project.toml");
        fs::write(&archive, b"zip").unwrap();
        fs::write(&descriptor, b"[project]").unwrap();

        let coordinate = Coordinate::new("com.example", "app");
        repo.install(&coordinate, "1.0", &archive, &descriptor)
            .unwrap();

        let target = repo.artifact_dir(&coordinate, "1.0");
        assert!(target.join("app-1.0.jar").is_file());
        assert!(target.join("app-1.0.toml").is_file());
    }
}
