//! Collapse an expanded version map into the final lib map and resolve
//! each selected coordinate's classpath paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use depot_core::config::ResolveConfig;
use depot_core::dependency::{Coord, Lib};
use depot_core::provider::Provider;
use depot_util::errors::DepotResult;
use depot_util::executor::Executor;

use crate::trace::TraceLog;
use crate::version_map::{LibPath, VersionMap};

/// Final flat selection: each transitively required lib mapped to its
/// chosen coordinate, the paths it contributes, and its immediate
/// dependents.
#[derive(Debug, Default)]
pub struct LibMap {
    pub libs: BTreeMap<Lib, ResolvedLib>,
    /// Include-decision log, present when tracing was requested.
    pub trace: Option<TraceLog>,
    /// Final per-path exclusion table, present when tracing was requested.
    pub exclusions: Option<HashMap<LibPath, HashSet<Lib>>>,
}

#[derive(Debug, Clone)]
pub struct ResolvedLib {
    pub coord: Coord,
    pub paths: Vec<PathBuf>,
    /// Immediate parent libs of the live sightings of this selection;
    /// empty for top deps.
    pub dependents: Vec<Lib>,
}

impl LibMap {
    pub fn get(&self, lib: &Lib) -> Option<&ResolvedLib> {
        self.libs.get(lib)
    }

    pub fn contains(&self, lib: &Lib) -> bool {
        self.libs.contains_key(lib)
    }

    pub fn len(&self) -> usize {
        self.libs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libs.is_empty()
    }
}

/// Build the lib map from an expanded version map, then resolve each
/// selection's paths concurrently through the pool.
///
/// A lib makes it into the map only if its selected coord retains at
/// least one live parent chain; selections stranded by later conflict
/// decisions are dropped here.
pub async fn lib_map(
    vmap: &VersionMap,
    provider: Arc<dyn Provider>,
    config: &ResolveConfig,
    pool: &Executor,
) -> DepotResult<LibMap> {
    let mut libs: BTreeMap<Lib, ResolvedLib> = BTreeMap::new();
    let mut liveness = Liveness::new(vmap);

    for lib in vmap.libs() {
        let Some(coord) = vmap.selected_coord(lib) else {
            continue;
        };
        let Some(paths) = vmap.selected_paths(lib) else {
            continue;
        };
        let live: Vec<&LibPath> = paths.iter().filter(|p| liveness.is_live(p)).collect();
        if live.is_empty() {
            tracing::debug!(%lib, "dropping orphaned selection");
            continue;
        }
        let mut dependents: Vec<Lib> = live.iter().filter_map(|p| p.last().cloned()).collect();
        dependents.sort();
        dependents.dedup();
        libs.insert(
            lib.clone(),
            ResolvedLib {
                coord: coord.clone(),
                paths: Vec::new(),
                dependents,
            },
        );
    }

    // Resolve artifact paths in parallel; the first failure aborts the
    // run with no partial map.
    let mut handles = Vec::with_capacity(libs.len());
    for (lib, resolved) in &libs {
        let provider = provider.clone();
        let task_lib = lib.clone();
        let coord = resolved.coord.clone();
        let config = config.clone();
        handles.push((
            lib.clone(),
            pool.submit(move || provider.coord_paths(&task_lib, &coord, &config)),
        ));
    }
    for (lib, handle) in handles {
        let paths = handle.join().await?;
        if let Some(entry) = libs.get_mut(&lib) {
            entry.paths = paths;
        }
    }

    Ok(LibMap {
        libs,
        trace: None,
        exclusions: None,
    })
}

/// Memoized liveness of parent chains.
///
/// A chain is live when every link still exists in the selected version
/// of its lib: `[l1 .. ln]` is live iff `[l1 .. l(n-1)]` is one of
/// `ln`'s selected parent paths, recursively down to the empty chain
/// (a top-dep sighting).
struct Liveness<'a> {
    vmap: &'a VersionMap,
    memo: HashMap<LibPath, bool>,
}

impl<'a> Liveness<'a> {
    fn new(vmap: &'a VersionMap) -> Self {
        Self {
            vmap,
            memo: HashMap::new(),
        }
    }

    fn is_live(&mut self, path: &[Lib]) -> bool {
        let Some((last, prefix)) = path.split_last() else {
            return true;
        };
        if let Some(&cached) = self.memo.get(path) {
            return cached;
        }
        let live = match self.vmap.selected_paths(last) {
            Some(paths) => paths.contains(prefix) && self.is_live(prefix),
            None => false,
        };
        self.memo.insert(path.to_vec(), live);
        live
    }
}
