//! Run configuration and caller-supplied argument maps.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dependency::{Coord, Lib};
use crate::manifest::de_dep_list;

/// Provider-facing configuration, threaded opaquely through every
/// provider call. The resolution core never inspects it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolveConfig {
    /// Named artifact repositories, e.g.
    /// `central = "https://repo1.maven.org/maven2/"`.
    #[serde(default)]
    pub repos: BTreeMap<String, String>,

    /// Local artifact cache directory; providers pick their own default
    /// when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

/// Caller-tunable settings for a resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolveSettings {
    /// Record an include-decision trace on the returned lib map.
    pub trace: bool,
    /// Worker pool width; defaults to host parallelism.
    pub threads: Option<usize>,
}

/// Modifiers applied on top of the declared top-level deps, usually
/// produced by combining aliases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArgsMap {
    /// Replacement top-level deps; when non-empty, used instead of the
    /// deps file's own `[deps]` table.
    #[serde(deserialize_with = "de_dep_list")]
    pub deps: Vec<(Lib, Coord)>,

    /// Additional top-level deps, seeded after the declared ones.
    #[serde(deserialize_with = "de_dep_list")]
    pub extra_deps: Vec<(Lib, Coord)>,

    /// Coordinates forced for a lib wherever it appears in the graph.
    pub override_deps: BTreeMap<Lib, Coord>,

    /// Coordinates supplied for a lib when an edge names no version.
    pub default_deps: BTreeMap<Lib, Coord>,

    /// Per-lib classpath replacements applied during assembly.
    pub classpath_overrides: BTreeMap<Lib, PathBuf>,

    /// Source directories placed on the classpath ahead of artifacts.
    pub paths: Vec<String>,

    /// Extra classpath entries placed before everything else.
    pub extra_paths: Vec<String>,

    /// JVM options, concatenated across aliases.
    pub jvm_opts: Vec<String>,

    /// Main-invocation options; the last non-empty alias wins.
    pub main_opts: Vec<String>,
}
