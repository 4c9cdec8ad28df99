//! Alias combination and classpath assembly on top of a resolved lib map.

pub mod aliases;
pub mod classpath;

pub use aliases::{combine_aliases, merge_args};
pub use classpath::make_classpath;
