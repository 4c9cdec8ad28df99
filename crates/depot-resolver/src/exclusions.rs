//! Exclusion tracking across parent paths.
//!
//! An edge may declare exclusions that suppress libraries anywhere below
//! it. Because the same (lib, version) can be reached through several
//! parents with different exclusion sets, the tracker keeps two views:
//! the exclusion set in effect at each parent path, and a per-(lib,
//! version) "cut" set of children withheld when the node was admitted.
//! Revisiting a node through a more permissive edge narrows the cut and
//! releases exactly the children no longer covered.

use std::collections::{HashMap, HashSet};

use depot_core::dependency::{Coord, CoordId, Lib};

use crate::trace::Reason;
use crate::version_map::LibPath;

/// Which children of a just-processed node should be enqueued.
///
/// Matching is classifier-insensitive: an exclusion naming `group/name`
/// covers `group/name$sub` as well.
#[derive(Debug, Clone)]
pub enum ChildFilter {
    /// Every child.
    All,
    /// Children not named by the edge's exclusion set.
    NotIn(HashSet<Lib>),
    /// Exactly the children a narrowed exclusion set uncovered; everything
    /// else was already enqueued on an earlier visit.
    OnlyIn(HashSet<Lib>),
}

impl ChildFilter {
    pub fn admits(&self, lib: &Lib) -> bool {
        match self {
            ChildFilter::All => true,
            ChildFilter::NotIn(set) => !contains_base(set, lib),
            ChildFilter::OnlyIn(set) => contains_base(set, lib),
        }
    }
}

fn contains_base(set: &HashSet<Lib>, lib: &Lib) -> bool {
    set.iter().any(|excl| excl.matches_base(lib))
}

/// Exclusion state accumulated during expansion.
#[derive(Debug, Default)]
pub struct ExclusionTracker {
    exclusions: HashMap<LibPath, HashSet<Lib>>,
    cut: HashMap<(Lib, CoordId), HashSet<Lib>>,
}

impl ExclusionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `lib` is excluded at `path`: walk the path's prefixes from
    /// longest to empty and check each registered exclusion set.
    pub fn is_excluded(&self, path: &[Lib], lib: &Lib) -> bool {
        let mut len = path.len();
        loop {
            if let Some(set) = self.exclusions.get(&path[..len]) {
                if contains_base(set, lib) {
                    return true;
                }
            }
            if len == 0 {
                return false;
            }
            len -= 1;
        }
    }

    /// Fold an include decision into the tracker.
    ///
    /// Returns the filter for enqueueing the node's children, or `None`
    /// when no child lookup should happen (omitted for any reason other
    /// than `same-version`).
    pub fn update(
        &mut self,
        lib: &Lib,
        use_coord: &Coord,
        coord_id: &CoordId,
        use_path: &[Lib],
        include: bool,
        reason: Reason,
    ) -> Option<ChildFilter> {
        if include {
            let excl: HashSet<Lib> = use_coord.exclusions.iter().cloned().collect();
            if excl.is_empty() {
                return Some(ChildFilter::All);
            }
            self.exclusions.insert(use_path.to_vec(), excl.clone());
            self.cut.insert((lib.clone(), coord_id.clone()), excl.clone());
            return Some(ChildFilter::NotIn(excl));
        }

        if reason == Reason::SameVersion {
            // Another parent reached the already-admitted version. Record
            // the new edge's exclusions, narrow the cut to the overlap,
            // and release exactly the children the old cut covered but
            // the new edge does not.
            let new_excl: HashSet<Lib> = use_coord.exclusions.iter().cloned().collect();
            if !new_excl.is_empty() {
                self.exclusions.insert(use_path.to_vec(), new_excl.clone());
            }
            let key = (lib.clone(), coord_id.clone());
            let prev = self.cut.get(&key).cloned().unwrap_or_default();
            let uncovered: HashSet<Lib> = prev.difference(&new_excl).cloned().collect();
            let narrowed: HashSet<Lib> = prev.intersection(&new_excl).cloned().collect();
            self.cut.insert(key, narrowed);
            return Some(ChildFilter::OnlyIn(uncovered));
        }

        None
    }

    /// The final per-path exclusion table, consumed for trace metadata.
    pub fn into_table(self) -> HashMap<LibPath, HashSet<Lib>> {
        self.exclusions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(s: &str) -> Lib {
        Lib::parse(s).unwrap()
    }

    fn cid(s: &str) -> CoordId {
        CoordId::new(s)
    }

    fn coord_excluding(version: &str, excl: &[&str]) -> Coord {
        Coord::mvn(version).with_exclusions(excl.iter().map(|s| lib(s)).collect())
    }

    #[test]
    fn include_without_exclusions_passes_everything() {
        let mut tracker = ExclusionTracker::new();
        let filter = tracker
            .update(
                &lib("g/a"),
                &Coord::mvn("1"),
                &cid("1"),
                &[lib("g/a")],
                true,
                Reason::NewDep,
            )
            .unwrap();
        assert!(filter.admits(&lib("g/anything")));
        assert!(!tracker.is_excluded(&[lib("g/a")], &lib("g/anything")));
    }

    #[test]
    fn include_with_exclusions_registers_and_filters() {
        let mut tracker = ExclusionTracker::new();
        let use_path = [lib("g/a"), lib("g/c")];
        let filter = tracker
            .update(
                &lib("g/c"),
                &coord_excluding("1", &["g/d"]),
                &cid("1"),
                &use_path,
                true,
                Reason::NewDep,
            )
            .unwrap();
        assert!(!filter.admits(&lib("g/d")));
        assert!(filter.admits(&lib("g/e")));
        // The registered set also applies to anything deeper on the path.
        assert!(tracker.is_excluded(&use_path, &lib("g/d")));
        assert!(tracker.is_excluded(&[lib("g/a"), lib("g/c"), lib("g/x")], &lib("g/d")));
    }

    #[test]
    fn exclusion_matches_classifier_base() {
        let mut tracker = ExclusionTracker::new();
        let use_path = [lib("g/c")];
        let filter = tracker
            .update(
                &lib("g/c"),
                &coord_excluding("1", &["g/d"]),
                &cid("1"),
                &use_path,
                true,
                Reason::NewDep,
            )
            .unwrap();
        assert!(!filter.admits(&lib("g/d$natives")));
        assert!(tracker.is_excluded(&use_path, &lib("g/d$natives")));
    }

    #[test]
    fn same_version_narrows_cut_and_releases_children() {
        let mut tracker = ExclusionTracker::new();
        let c = lib("g/c");
        // First visit under a: c@1 admitted with {d} cut away.
        tracker.update(
            &c,
            &coord_excluding("1", &["g/d"]),
            &cid("1"),
            &[lib("g/a"), c.clone()],
            true,
            Reason::NewDep,
        );
        // Second visit under b with no exclusions: d is released.
        let filter = tracker
            .update(
                &c,
                &Coord::mvn("1"),
                &cid("1"),
                &[lib("g/b"), c.clone()],
                false,
                Reason::SameVersion,
            )
            .unwrap();
        assert!(filter.admits(&lib("g/d")));
        // Children never cut must not be re-enqueued.
        assert!(!filter.admits(&lib("g/e")));
        // A third visit finds an empty cut: nothing further to release.
        let filter = tracker
            .update(
                &c,
                &Coord::mvn("1"),
                &cid("1"),
                &[lib("g/x"), c.clone()],
                false,
                Reason::SameVersion,
            )
            .unwrap();
        assert!(!filter.admits(&lib("g/d")));
    }

    #[test]
    fn same_version_keeps_overlap_cut() {
        let mut tracker = ExclusionTracker::new();
        let c = lib("g/c");
        tracker.update(
            &c,
            &coord_excluding("1", &["g/d", "g/e"]),
            &cid("1"),
            &[lib("g/a"), c.clone()],
            true,
            Reason::NewDep,
        );
        // New edge still excludes e but not d: only d is released.
        let filter = tracker
            .update(
                &c,
                &coord_excluding("1", &["g/e"]),
                &cid("1"),
                &[lib("g/b"), c.clone()],
                false,
                Reason::SameVersion,
            )
            .unwrap();
        assert!(filter.admits(&lib("g/d")));
        assert!(!filter.admits(&lib("g/e")));
        // The new edge's own exclusions are registered at its path.
        assert!(tracker.is_excluded(&[lib("g/b"), c.clone()], &lib("g/e")));
    }

    #[test]
    fn omit_reasons_change_nothing() {
        let mut tracker = ExclusionTracker::new();
        for reason in [
            Reason::Excluded,
            Reason::UseTop,
            Reason::ParentOmitted,
            Reason::OlderVersion,
        ] {
            let filter = tracker.update(
                &lib("g/a"),
                &coord_excluding("1", &["g/d"]),
                &cid("1"),
                &[lib("g/a")],
                false,
                reason,
            );
            assert!(filter.is_none());
        }
        assert!(!tracker.is_excluded(&[lib("g/a")], &lib("g/d")));
    }

    #[test]
    fn is_excluded_walks_all_prefixes() {
        let mut tracker = ExclusionTracker::new();
        tracker.update(
            &lib("g/a"),
            &coord_excluding("1", &["g/noisy"]),
            &cid("1"),
            &[lib("g/a")],
            true,
            Reason::NewTopDep,
        );
        // Excluded several levels below the registering path.
        let deep = [lib("g/a"), lib("g/b"), lib("g/c")];
        assert!(tracker.is_excluded(&deep, &lib("g/noisy")));
        // A sibling subtree is unaffected.
        assert!(!tracker.is_excluded(&[lib("g/other")], &lib("g/noisy")));
    }
}
