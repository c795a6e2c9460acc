//! Rulesets and the dependency graph between them.

mod graph;
mod record;
mod types;
mod version;

pub use graph::{
    is_compatible, CompatibilityReport, ContentPathProbe, RulesetGraph, VersionCheck,
};
pub use record::{Ruleset, DEFAULT_SCHEMA_VERSION};
pub use types::{DependencyEdge, DependencyKind, RulesetStatus, RulesetType};
pub use version::{versions_compatible, Version, VersionConstraint};
