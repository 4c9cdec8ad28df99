//! Dependency resolution engine: concurrent transitive expansion with
//! top-dep-wins / newer-wins conflict rules, per-path exclusion tracking,
//! and classpath path materialization.

pub mod exclusions;
pub mod materialize;
pub mod resolver;
pub mod trace;
pub mod tree;
pub mod version_map;

pub use materialize::{LibMap, ResolvedLib};
pub use resolver::resolve_deps;
pub use trace::{Reason, TraceEntry, TraceLog};
pub use tree::{print_tree, render_tree};
