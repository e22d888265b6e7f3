//! Archive assembly
//!
//! Writes the distributable archive for a leaf project: the rendered
//! manifest under `META-INF/MANIFEST.MF`, followed by a depth-first walk of
//! the compiled-output tree. Directory nodes become zero-byte entries with a
//! trailing separator; file nodes carry their full content; every stored
//! name is the node's path with the output-directory prefix stripped.
//!
//! Entry order follows filesystem traversal order. The destination is opened
//! create/truncate, so repackaging fully overwrites any prior archive.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::{FileOptions, ZipWriter};

use super::manifest::{render_manifest, ManifestConfig};
use crate::build::Layout;
use crate::domain::EffectiveProject;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Output directory not found: {0}")]
    MissingOutput(PathBuf),

    #[error("Archive I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("Archive write failure: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Entry name is not valid UTF-8: {0}")]
    InvalidEntryName(PathBuf),
}

/// Assembles `<artifact>-<version>.<packaging>` in the target directory and
/// returns its path
pub fn assemble(
    project: &EffectiveProject,
    layout: &Layout,
    manifest: &ManifestConfig,
) -> Result<PathBuf, PackageError> {
    let classes = layout.classes();
    if !classes.is_dir() {
        return Err(PackageError::MissingOutput(classes));
    }

    let archive_path = layout.target().join(project.archive_name());
    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);

    zip.add_directory::<_, ()>("META-INF/", FileOptions::default())?;
    zip.start_file::<_, ()>("META-INF/MANIFEST.MF", FileOptions::default())?;
    io::Write::write_all(
        &mut zip,
        render_manifest(manifest, &project.manifest_entries).as_bytes(),
    )?;

    add_tree(&mut zip, &classes, &classes)?;

    zip.finish()?;
    Ok(archive_path)
}

/// Depth-first walk; the root itself gets no entry
fn add_tree(
    zip: &mut ZipWriter<File>,
    dir: &Path,
    root: &Path,
) -> Result<(), PackageError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = entry_name(&path, root)?;

        if path.is_dir() {
            zip.add_directory::<_, ()>(format!("{name}/"), FileOptions::default())?;
            add_tree(zip, &path, root)?;
        } else {
            zip.start_file::<_, ()>(name, FileOptions::default())?;
            // Per-entry stream, dropped as soon as the copy completes
            let mut source = File::open(&path)?;
            io::copy(&mut source, zip)?;
        }
    }

    Ok(())
}

/// Relative name: the path minus the root prefix, with forward slashes
fn entry_name(path: &Path, root: &Path) -> Result<String, PackageError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| PackageError::InvalidEntryName(path.to_path_buf()))?;
    let name = relative
        .to_str()
        .ok_or_else(|| PackageError::InvalidEntryName(path.to_path_buf()))?;

    if std::path::MAIN_SEPARATOR == '/' {
        Ok(name.to_string())
    } else {
        Ok(name.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}
