//! mason - Fast in-process incremental builds for descriptor-based projects
//!
//! mason composes an effective build configuration from a `project.toml`
//! descriptor hierarchy (parent, child, multi-module aggregator), plans
//! incremental compilation from modification times, assembles a
//! distributable archive with a generated manifest, and sequences the whole
//! lifecycle with fail-fast short-circuiting. Descriptor parsing, dependency
//! resolution, compilation, and publishing are collaborator traits with
//! swappable adapters.

pub mod archive;
pub mod build;
pub mod cli;
pub mod compose;
pub mod domain;
pub mod external;
pub mod lifecycle;

pub use compose::Composer;
pub use domain::{Coordinate, Dependency, EffectiveProject, RawModel};
pub use lifecycle::{Lifecycle, Phase};
