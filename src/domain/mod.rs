//! Domain models for mason
//!
//! Contains the build data model without any I/O concerns.

mod coordinate;
mod dependency;
mod model;
mod project;

pub use coordinate::{Coordinate, CoordinateError};
pub use dependency::{dedup_first_seen, Dependency, DependencySpec, Scope};
pub use model::{ParentRef, RawModel};
pub use project::EffectiveProject;
