//! Core expansion algorithm: breadth-first transitive walk with
//! top-dep-wins / newer-wins conflict resolution, per-path exclusions,
//! and concurrent child-dependency fetches.
//!
//! The coordinator is strictly sequential and owns all resolution state;
//! workers only fetch child-dependency lists and artifact paths. Child
//! fetches race in the pool but their results are consumed in enqueue
//! order, so the traversal and every include decision are deterministic
//! for deterministic providers.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::Arc;

use depot_core::config::{ArgsMap, ResolveConfig, ResolveSettings};
use depot_core::dependency::{Coord, CoordId, Lib};
use depot_core::manifest::DepsFile;
use depot_core::provider::Provider;
use depot_util::errors::{DepotError, DepotResult};
use depot_util::executor::{self, Executor, TaskHandle};

use crate::exclusions::{ChildFilter, ExclusionTracker};
use crate::materialize::{self, LibMap};
use crate::trace::{Reason, TraceEntry, TraceLog};
use crate::version_map::VersionMap;

/// One edge on a queue path: the lib plus the coordinate its parent
/// declared for it. Absent when the parent's manifest named no version;
/// `default-deps` may supply one.
type Edge = (Lib, Option<Coord>);

/// Work items in the coordinator's FIFO queue.
enum QueueItem {
    /// A node to visit; the last edge is the node, the prefix its parents.
    Node(Vec<Edge>),
    /// A pending child-dependency fetch for an admitted node.
    ChildLookup {
        pending: TaskHandle<Vec<Edge>>,
        parent_path: Vec<Edge>,
        filter: ChildFilter,
    },
}

/// Expand `deps` (modified by `args`) into a flat selection of every
/// transitively required library, with the local paths each selected
/// coordinate contributes.
///
/// Conflicts resolve top-dep-wins first, newer-wins among non-top libs.
/// Resolution is all-or-nothing: the first provider failure shuts the
/// worker pool down and surfaces immediately.
pub async fn resolve_deps(
    deps: &DepsFile,
    args: Option<&ArgsMap>,
    settings: &ResolveSettings,
    provider: Arc<dyn Provider>,
) -> DepotResult<LibMap> {
    let threads = settings.threads.unwrap_or_else(executor::default_threads);
    let pool = Executor::new(threads);
    match run(deps, args, settings, provider, &pool).await {
        Ok(lib_map) => Ok(lib_map),
        Err(err) => {
            pool.shutdown();
            Err(err)
        }
    }
}

async fn run(
    deps: &DepsFile,
    args: Option<&ArgsMap>,
    settings: &ResolveSettings,
    provider: Arc<dyn Provider>,
    pool: &Executor,
) -> DepotResult<LibMap> {
    let (vmap, tracker, trace) = expand(deps, args, settings, provider.clone(), pool).await?;
    let mut lib_map = materialize::lib_map(&vmap, provider, &deps.config, pool).await?;
    if settings.trace {
        lib_map.trace = trace;
        lib_map.exclusions = Some(tracker.into_table());
    }
    Ok(lib_map)
}

/// Top-level seeding order: the declared deps (or the alias replacement
/// set) followed by `extra-deps`. Order is significant: when two top
/// deps name the same lib, the first listed wins.
fn top_deps<'a>(deps: &'a DepsFile, args: Option<&'a ArgsMap>) -> Vec<(&'a Lib, &'a Coord)> {
    let base = match args {
        Some(a) if !a.deps.is_empty() => &a.deps,
        _ => &deps.deps,
    };
    let mut tops: Vec<(&Lib, &Coord)> = base.iter().map(|(l, c)| (l, c)).collect();
    if let Some(a) = args {
        tops.extend(a.extra_deps.iter().map(|(l, c)| (l, c)));
    }
    tops
}

async fn expand(
    deps: &DepsFile,
    args: Option<&ArgsMap>,
    settings: &ResolveSettings,
    provider: Arc<dyn Provider>,
    pool: &Executor,
) -> DepotResult<(VersionMap, ExclusionTracker, Option<TraceLog>)> {
    let config = &deps.config;
    let mut vmap = VersionMap::new();
    let mut tracker = ExclusionTracker::new();
    let mut trace = settings.trace.then(TraceLog::new);

    let mut q: VecDeque<QueueItem> = VecDeque::new();
    let mut pendq: VecDeque<Vec<Edge>> = VecDeque::new();

    for (lib, coord) in top_deps(deps, args) {
        let (lib, coord) = provider.canonicalize(lib, coord, config)?;
        q.push_back(QueueItem::Node(vec![(lib, Some(coord))]));
    }

    loop {
        // Paths produced by the most recent child lookup are consumed
        // before anything further is popped from the main queue.
        let path = if let Some(path) = pendq.pop_front() {
            path
        } else {
            match q.pop_front() {
                None => break,
                Some(QueueItem::Node(path)) => path,
                Some(QueueItem::ChildLookup {
                    pending,
                    parent_path,
                    filter,
                }) => {
                    let children = pending.join().await?;
                    pendq.extend(children.into_iter().filter(|(l, _)| filter.admits(l)).map(
                        |edge| {
                            let mut path = parent_path.clone();
                            path.push(edge);
                            path
                        },
                    ));
                    continue;
                }
            }
        };

        let Some(((lib, edge_coord), parent_edges)) = path.split_last() else {
            continue;
        };
        let parents: Vec<Lib> = parent_edges.iter().map(|(l, _)| l.clone()).collect();

        // Effective coordinate: override wins, then the edge's own
        // declaration, then default-deps.
        let override_coord = args
            .and_then(|a| a.override_deps.get(lib))
            .cloned();
        let chosen = override_coord
            .clone()
            .or_else(|| edge_coord.clone())
            .or_else(|| args.and_then(|a| a.default_deps.get(lib)).cloned());
        let Some(chosen) = chosen else {
            return Err(DepotError::config(format!(
                "no coordinate declared for {lib} and no default-deps entry supplies one"
            )));
        };
        let use_coord = provider.manifest_type(lib, &chosen, config)?;
        let coord_id = provider.dep_id(lib, &use_coord, config)?;

        let (include, reason) = decide(
            &mut vmap,
            &tracker,
            lib,
            &use_coord,
            &coord_id,
            &parents,
            provider.as_ref(),
            config,
        )?;

        if let Some(log) = trace.as_mut() {
            log.push(TraceEntry {
                path: parents.clone(),
                lib: lib.clone(),
                coord: edge_coord.clone(),
                use_coord: use_coord.clone(),
                coord_id: coord_id.clone(),
                override_coord,
                include,
                reason,
            });
        }

        let mut use_path = parents;
        use_path.push(lib.clone());

        if let Some(filter) = tracker.update(lib, &use_coord, &coord_id, &use_path, include, reason)
        {
            // Descendant paths carry the effective coordinate, not the
            // edge's raw one, so exclusions and roots propagate.
            let mut parent_path = parent_edges.to_vec();
            parent_path.push((lib.clone(), Some(use_coord.clone())));
            let pending = {
                let provider = provider.clone();
                let lib = lib.clone();
                let coord = use_coord.clone();
                let config = config.clone();
                pool.submit(move || provider.coord_deps(&lib, &coord, &config))
            };
            q.push_back(QueueItem::ChildLookup {
                pending,
                parent_path,
                filter,
            });
        }
    }

    Ok((vmap, tracker, trace))
}

/// The include decision: the first matching rule wins.
///
/// | rule | condition            | outcome                          |
/// |------|----------------------|----------------------------------|
/// | 1    | no parents           | include, select as top           |
/// | 2    | excluded on path     | omit                             |
/// | 3    | lib is a top dep     | omit (top-dep-wins)              |
/// | 4    | parent displaced     | omit (orphaned work)             |
/// | 5    | first sighting       | include, select                  |
/// | 6    | same as selected     | omit, still record the path      |
/// | 7    | newer than selected  | include, select (newer-wins)     |
/// | 8    | otherwise            | omit                             |
#[allow(clippy::too_many_arguments)]
fn decide(
    vmap: &mut VersionMap,
    tracker: &ExclusionTracker,
    lib: &Lib,
    use_coord: &Coord,
    coord_id: &CoordId,
    parents: &[Lib],
    provider: &dyn Provider,
    config: &ResolveConfig,
) -> DepotResult<(bool, Reason)> {
    if parents.is_empty() {
        vmap.add_version(lib, use_coord, parents, coord_id);
        vmap.select_version(lib, coord_id, true);
        return Ok((true, Reason::NewTopDep));
    }

    if tracker.is_excluded(parents, lib) {
        return Ok((false, Reason::Excluded));
    }

    if vmap.is_top(lib) {
        return Ok((false, Reason::UseTop));
    }

    if vmap.parent_missing(parents) {
        tracing::debug!(%lib, "dropping child of a displaced parent");
        return Ok((false, Reason::ParentOmitted));
    }

    if !vmap.contains(lib) {
        vmap.add_version(lib, use_coord, parents, coord_id);
        vmap.select_version(lib, coord_id, false);
        return Ok((true, Reason::NewDep));
    }

    if vmap.selected_version(lib) == Some(coord_id) {
        // Same version through another parent: the new path must still be
        // recorded, downstream orphan checks depend on it.
        vmap.add_version(lib, use_coord, parents, coord_id);
        return Ok((false, Reason::SameVersion));
    }

    match vmap.selected_coord(lib).cloned() {
        Some(selected) => {
            if provider.compare_versions(lib, use_coord, &selected, config)? == Ordering::Greater {
                tracing::debug!(%lib, new = %use_coord, old = %selected, "newer version selected");
                vmap.add_version(lib, use_coord, parents, coord_id);
                vmap.select_version(lib, coord_id, false);
                Ok((true, Reason::NewerVersion))
            } else {
                Ok((false, Reason::OlderVersion))
            }
        }
        None => {
            // An entry always gains a selection with its first sighting;
            // treat a bare entry as a first sighting again.
            vmap.add_version(lib, use_coord, parents, coord_id);
            vmap.select_version(lib, coord_id, false);
            Ok((true, Reason::NewDep))
        }
    }
}
