//! The provider contract: everything the resolution core delegates.
//!
//! A provider interprets one or more [`CoordSource`](crate::dependency::CoordSource)
//! variants: it normalizes coordinates, assigns version identities,
//! discovers direct dependencies, orders versions, and locates artifacts
//! on disk. The engine itself never looks inside a coordinate.
//!
//! Implementations must be shareable across worker threads: `coord_deps`
//! and `coord_paths` are called concurrently from the pool, so any
//! internal caches need their own synchronization.

use std::cmp::Ordering;
use std::path::PathBuf;

use depot_util::errors::DepotResult;

use crate::config::ResolveConfig;
use crate::dependency::{Coord, CoordId, Lib};

pub trait Provider: Send + Sync + 'static {
    /// Normalize a lib and coord pair, e.g. resolve a relative local path
    /// against the current directory. Called once per top-level dep.
    fn canonicalize(&self, lib: &Lib, coord: &Coord, config: &ResolveConfig)
        -> DepotResult<(Lib, Coord)>;

    /// Stable identity for conflict comparison: coords with equal ids are
    /// the same version.
    fn dep_id(&self, lib: &Lib, coord: &Coord, config: &ResolveConfig) -> DepotResult<CoordId>;

    /// Return the coord with its manifest kind detected; a no-op when the
    /// coord already carries one.
    fn manifest_type(&self, lib: &Lib, coord: &Coord, config: &ResolveConfig)
        -> DepotResult<Coord>;

    /// Direct dependencies of a coord, in manifest order. An entry may
    /// carry no coordinate when the manifest names no version; the
    /// engine's `default-deps` can supply one.
    ///
    /// Relative local roots inside the manifest are resolved against
    /// `coord.root`. Called from worker threads.
    fn coord_deps(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> DepotResult<Vec<(Lib, Option<Coord>)>>;

    /// Total order over the provider's version space.
    fn compare_versions(
        &self,
        lib: &Lib,
        a: &Coord,
        b: &Coord,
        config: &ResolveConfig,
    ) -> DepotResult<Ordering>;

    /// Local filesystem paths the coord contributes to a classpath.
    /// Called after selection, from worker threads.
    fn coord_paths(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> DepotResult<Vec<PathBuf>>;

    /// Expected on-disk location of the coord's artifact; may be queried
    /// before anything is fetched.
    fn lib_location(&self, lib: &Lib, coord: &Coord, config: &ResolveConfig)
        -> DepotResult<PathBuf>;

    /// One-line rendering used by tree output.
    fn coord_summary(&self, lib: &Lib, coord: &Coord) -> String {
        format!("{lib} {coord}")
    }
}
