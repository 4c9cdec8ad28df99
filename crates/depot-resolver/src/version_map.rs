//! Per-library version bookkeeping for the expansion loop.
//!
//! Every sighting of a library is recorded: which coordinates were seen,
//! through which parent paths each arrived, and which one is currently
//! selected. Entries are never removed; a displaced selection leaves its
//! old paths behind and orphaned subtrees are filtered at extraction.

use std::collections::{HashMap, HashSet};

use depot_core::dependency::{Coord, CoordId, Lib};

/// Parent chain from a root top dep down to (excluding) a node.
pub type LibPath = Vec<Lib>;

/// Tracks, per library, all observed versions, the parent paths each
/// arrived through, and the current selection.
#[derive(Debug, Default)]
pub struct VersionMap {
    entries: HashMap<Lib, VersionEntry>,
}

#[derive(Debug, Default)]
pub struct VersionEntry {
    versions: HashMap<CoordId, Coord>,
    paths: HashMap<CoordId, HashSet<LibPath>>,
    select: Option<CoordId>,
    top: bool,
}

impl VersionEntry {
    pub fn versions(&self) -> &HashMap<CoordId, Coord> {
        &self.versions
    }

    pub fn paths(&self, coord_id: &CoordId) -> Option<&HashSet<LibPath>> {
        self.paths.get(coord_id)
    }

    pub fn select(&self) -> Option<&CoordId> {
        self.select.as_ref()
    }

    pub fn top(&self) -> bool {
        self.top
    }
}

impl VersionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, lib: &Lib) -> bool {
        self.entries.contains_key(lib)
    }

    pub fn is_top(&self, lib: &Lib) -> bool {
        self.entries.get(lib).is_some_and(|e| e.top)
    }

    pub fn entry(&self, lib: &Lib) -> Option<&VersionEntry> {
        self.entries.get(lib)
    }

    pub fn libs(&self) -> impl Iterator<Item = &Lib> {
        self.entries.keys()
    }

    /// Register a sighting of `coord` for `lib` through `parent_path`.
    pub fn add_version(&mut self, lib: &Lib, coord: &Coord, parent_path: &[Lib], coord_id: &CoordId) {
        let entry = self.entries.entry(lib.clone()).or_default();
        entry
            .versions
            .entry(coord_id.clone())
            .or_insert_with(|| coord.clone());
        entry
            .paths
            .entry(coord_id.clone())
            .or_default()
            .insert(parent_path.to_vec());
    }

    /// Choose `coord_id` as the selected version for `lib`.
    ///
    /// A top-level selection is immutable: once a lib is selected as a
    /// top dep, later top sightings of the same lib do not displace it
    /// (the first listed top dep wins).
    pub fn select_version(&mut self, lib: &Lib, coord_id: &CoordId, is_top: bool) {
        let entry = self.entries.entry(lib.clone()).or_default();
        if is_top && entry.top {
            return;
        }
        entry.select = Some(coord_id.clone());
        if is_top {
            entry.top = true;
        }
    }

    pub fn selected_version(&self, lib: &Lib) -> Option<&CoordId> {
        self.entries.get(lib).and_then(|e| e.select.as_ref())
    }

    pub fn selected_coord(&self, lib: &Lib) -> Option<&Coord> {
        let entry = self.entries.get(lib)?;
        entry.versions.get(entry.select.as_ref()?)
    }

    /// Parent paths recorded for the selected coord of `lib`.
    pub fn selected_paths(&self, lib: &Lib) -> Option<&HashSet<LibPath>> {
        let entry = self.entries.get(lib)?;
        entry.paths.get(entry.select.as_ref()?)
    }

    /// Orphan check for a child whose parent chain is `parents`.
    ///
    /// With `parents = grandparents ++ [parent_lib]`, the child's work is
    /// stale iff `grandparents` is not among the parent paths of
    /// `parent_lib`'s currently selected coord: the sighting of the
    /// parent that produced this child has been displaced.
    pub fn parent_missing(&self, parents: &[Lib]) -> bool {
        let Some((parent_lib, grandparents)) = parents.split_last() else {
            return false;
        };
        match self.selected_paths(parent_lib) {
            Some(paths) => !paths.contains(grandparents),
            None => true,
        }
    }
}
