//! Project composition
//!
//! Builds an `EffectiveProject` from a descriptor tree. Three mutually
//! exclusive modes are selected from the raw model:
//!
//! - **aggregator**: the descriptor lists modules; one child project is
//!   composed per module and the aggregator produces no output of its own
//! - **child**: the descriptor names a parent; the parent is composed from
//!   the default sibling path `<dir>/../<descriptor-name>` (or supplied
//!   explicitly) and its configuration is merged underneath the child's
//! - **plain**: neither; the descriptor stands alone
//!
//! Parent/child cross-references are a tree traversal driven by the caller,
//! never followed both ways at once: a misconfigured parent chain terminates
//! at the first missing descriptor file with a `ParseError`, and a chain
//! deeper than `MAX_DEPTH` levels (including a descriptor at the filesystem
//! root whose sibling parent path resolves back to itself) is rejected
//! outright.

mod interpolate;

pub use interpolate::expand;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::domain::{dedup_first_seen, Dependency, DependencySpec, EffectiveProject, RawModel};
use crate::external::{DescriptorReader, ParseError};

/// Upper bound on parent/module nesting
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Descriptor {0} has no file name")]
    InvalidPath(std::path::PathBuf),

    #[error("Descriptor hierarchy at {0} is deeper than {MAX_DEPTH} levels")]
    DepthExceeded(std::path::PathBuf),
}

/// Composes effective projects from descriptor files
pub struct Composer<'a, R: DescriptorReader> {
    reader: &'a R,
}

impl<'a, R: DescriptorReader> Composer<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Composes the project rooted at `descriptor`. `base_repositories` is
    /// the lowest-precedence layer of the repository merge.
    pub fn compose(
        &self,
        descriptor: &Path,
        base_repositories: &BTreeMap<String, String>,
    ) -> Result<EffectiveProject, ComposeError> {
        self.compose_at(descriptor, base_repositories, 0)
    }

    fn compose_at(
        &self,
        descriptor: &Path,
        base_repositories: &BTreeMap<String, String>,
        depth: usize,
    ) -> Result<EffectiveProject, ComposeError> {
        if depth > MAX_DEPTH {
            return Err(ComposeError::DepthExceeded(descriptor.to_path_buf()));
        }

        let raw = self.reader.read(descriptor)?;

        if raw.is_aggregator() {
            self.compose_aggregator(raw, descriptor, base_repositories, None, depth)
        } else if raw.parent.is_some() {
            let parent = self.compose_at(
                &self.sibling_parent_path(descriptor)?,
                base_repositories,
                depth + 1,
            )?;
            Ok(self.compose_child(raw, descriptor, &parent))
        } else {
            Ok(self.compose_plain(raw, descriptor, base_repositories))
        }
    }

    /// Child-mode composition against an explicitly supplied parent,
    /// bypassing the default sibling-path lookup
    pub fn compose_with_parent(
        &self,
        descriptor: &Path,
        parent: &EffectiveProject,
    ) -> Result<EffectiveProject, ComposeError> {
        let raw = self.reader.read(descriptor)?;
        Ok(self.compose_child(raw, descriptor, parent))
    }

    /// Default parent location: `<dir>/../<descriptor-name>`
    fn sibling_parent_path(&self, descriptor: &Path) -> Result<std::path::PathBuf, ComposeError> {
        let name = descriptor
            .file_name()
            .ok_or_else(|| ComposeError::InvalidPath(descriptor.to_path_buf()))?;
        let dir = descriptor.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join("..").join(name))
    }

    fn compose_plain(
        &self,
        raw: RawModel,
        descriptor: &Path,
        base_repositories: &BTreeMap<String, String>,
    ) -> EffectiveProject {
        let dependencies = expand_specs(&raw.dependencies, &raw.properties);
        let repositories = merge_maps(base_repositories, &raw.repositories);

        EffectiveProject {
            coordinate: raw.coordinate(),
            version: raw.version,
            packaging: raw.packaging,
            descriptor: descriptor.to_path_buf(),
            parent: None,
            children: vec![],
            properties: raw.properties,
            dependencies: dedup_first_seen(dependencies),
            repositories,
            compiler_options: raw.compiler_options,
            manifest_entries: raw.manifest_entries,
            artifacts: None,
        }
    }

    fn compose_child(
        &self,
        raw: RawModel,
        descriptor: &Path,
        parent: &EffectiveProject,
    ) -> EffectiveProject {
        // Child keys override parent keys on collision
        let properties = merge_maps(&parent.properties, &raw.properties);

        // Child-expanded list first, then the parent's already-expanded
        // list; first occurrence wins in the dedup
        let mut dependencies = expand_specs(&raw.dependencies, &properties);
        dependencies.extend(parent.dependencies.iter().cloned());

        let repositories = merge_maps(&parent.repositories, &raw.repositories);

        // Taken before the option list is moved out of the model below
        let coordinate = raw.coordinate();

        let compiler_options = if raw.compiler_options.is_empty() {
            parent.compiler_options.clone()
        } else {
            raw.compiler_options
        };

        EffectiveProject {
            coordinate,
            version: raw.version,
            packaging: raw.packaging,
            descriptor: descriptor.to_path_buf(),
            parent: Some(parent.coordinate.clone()),
            children: vec![],
            properties,
            dependencies: dedup_first_seen(dependencies),
            repositories,
            compiler_options,
            manifest_entries: raw.manifest_entries,
            artifacts: None,
        }
    }

    /// Aggregator composition. `inherited` carries the enclosing
    /// aggregator's effective view when aggregators nest.
    fn compose_aggregator(
        &self,
        raw: RawModel,
        descriptor: &Path,
        base_repositories: &BTreeMap<String, String>,
        inherited: Option<&EffectiveProject>,
        depth: usize,
    ) -> Result<EffectiveProject, ComposeError> {
        if depth > MAX_DEPTH {
            return Err(ComposeError::DepthExceeded(descriptor.to_path_buf()));
        }
        let name = descriptor
            .file_name()
            .ok_or_else(|| ComposeError::InvalidPath(descriptor.to_path_buf()))?
            .to_os_string();
        let dir = descriptor.parent().unwrap_or_else(|| Path::new("."));
        let modules = raw.modules.clone();

        // The aggregator's own view, composed first so each module can merge
        // against it as its parent context
        let mut aggregator = match inherited {
            Some(outer) => self.compose_child(raw, descriptor, outer),
            None => self.compose_plain(raw, descriptor, base_repositories),
        };

        let mut children = Vec::with_capacity(modules.len());
        for module in &modules {
            let module_descriptor = dir.join(module).join(&name);
            let module_raw = self.reader.read(&module_descriptor)?;

            let child = if module_raw.is_aggregator() {
                self.compose_aggregator(
                    module_raw,
                    &module_descriptor,
                    base_repositories,
                    Some(&aggregator),
                    depth + 1,
                )?
            } else {
                // Module versions expand against the union of the
                // aggregator's and the module's own properties
                self.compose_child(module_raw, &module_descriptor, &aggregator)
            };
            children.push(child);
        }

        // The aggregator's dependency field is the per-module lists
        // flattened in module order and deduplicated first-seen
        let collected: Vec<Dependency> = children
            .iter()
            .flat_map(|child| child.dependencies.iter().cloned())
            .collect();
        aggregator.dependencies = dedup_first_seen(collected);
        aggregator.children = children;

        Ok(aggregator)
    }
}

fn expand_specs(
    specs: &[DependencySpec],
    properties: &BTreeMap<String, String>,
) -> Vec<Dependency> {
    specs
        .iter()
        .map(|spec| spec.with_version(expand(&spec.version, properties)))
        .collect()
}

/// Overlay merge: `over` wins on key collision
fn merge_maps(
    base: &BTreeMap<String, String>,
    over: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    merged.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
