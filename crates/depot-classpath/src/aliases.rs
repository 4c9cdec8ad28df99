//! Alias combination: fold named argument fragments from the deps file
//! into a single args map.

use depot_core::config::ArgsMap;
use depot_core::dependency::{Coord, Lib};
use depot_core::manifest::DepsFile;
use depot_util::errors::{DepotError, DepotResult};

/// Combine the named aliases, left to right, into one [`ArgsMap`].
///
/// Merge rules per key:
/// - `deps`, `extra-deps`, `override-deps`, `default-deps`,
///   `classpath-overrides`: merged as maps, right wins per lib;
/// - `paths`, `extra-paths`: concatenated, de-duplicated preserving
///   first occurrence;
/// - `jvm-opts`: concatenated;
/// - `main-opts`: the last non-empty alias wins.
///
/// An undefined alias name, or an unrecognized key inside an alias
/// table, fails with [`DepotError::Alias`].
pub fn combine_aliases(deps: &DepsFile, names: &[&str]) -> DepotResult<ArgsMap> {
    let mut args = ArgsMap::default();
    for name in names {
        let alias = deps.aliases.get(*name).ok_or_else(|| DepotError::Alias {
            key: (*name).to_string(),
        })?;
        if let Some((key, _)) = alias.unknown.first_key_value() {
            return Err(DepotError::Alias {
                key: format!("{name}.{key}"),
            });
        }
        merge_args(&mut args, &alias.args);
    }
    Ok(args)
}

/// Apply `src` onto `dst` under the per-key merge rules. Combining
/// aliases `{A, B}` in one call equals combining `{A}` then applying
/// `{B}`'s result with this function.
pub fn merge_args(dst: &mut ArgsMap, src: &ArgsMap) {
    merge_dep_list(&mut dst.deps, &src.deps);
    merge_dep_list(&mut dst.extra_deps, &src.extra_deps);
    for (lib, coord) in &src.override_deps {
        dst.override_deps.insert(lib.clone(), coord.clone());
    }
    for (lib, coord) in &src.default_deps {
        dst.default_deps.insert(lib.clone(), coord.clone());
    }
    for (lib, path) in &src.classpath_overrides {
        dst.classpath_overrides.insert(lib.clone(), path.clone());
    }
    concat_dedup(&mut dst.paths, &src.paths);
    concat_dedup(&mut dst.extra_paths, &src.extra_paths);
    dst.jvm_opts.extend(src.jvm_opts.iter().cloned());
    if !src.main_opts.is_empty() {
        dst.main_opts = src.main_opts.clone();
    }
}

/// Right-wins merge that keeps each lib's first position.
fn merge_dep_list(dst: &mut Vec<(Lib, Coord)>, src: &[(Lib, Coord)]) {
    for (lib, coord) in src {
        match dst.iter_mut().find(|(l, _)| l == lib) {
            Some(slot) => slot.1 = coord.clone(),
            None => dst.push((lib.clone(), coord.clone())),
        }
    }
}

fn concat_dedup(dst: &mut Vec<String>, src: &[String]) {
    for entry in src {
        if !dst.contains(entry) {
            dst.push(entry.clone());
        }
    }
}
