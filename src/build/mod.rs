//! Incremental compilation planning

mod layout;
mod planner;

pub use layout::{Layout, SOURCE_EXTENSION, UNIT_EXTENSION};
pub use planner::{plan, BuildPlan, PlanError, CLASSPATH_SEPARATOR};
