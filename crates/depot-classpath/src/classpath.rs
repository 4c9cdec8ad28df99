//! Classpath assembly from a resolved lib map.

use depot_core::config::ArgsMap;
use depot_resolver::LibMap;

/// Join extra paths, project paths, and each selected lib's artifact
/// paths into a platform classpath string.
///
/// A lib present in `classpath-overrides` contributes the override path
/// instead of whatever its provider resolved. Blank entries are dropped.
pub fn make_classpath(lib_map: &LibMap, paths: &[String], args: &ArgsMap) -> String {
    let mut entries: Vec<String> = Vec::new();
    entries.extend(args.extra_paths.iter().cloned());
    entries.extend(paths.iter().cloned());
    for (lib, resolved) in &lib_map.libs {
        match args.classpath_overrides.get(lib) {
            Some(override_path) => entries.push(override_path.to_string_lossy().into_owned()),
            None => entries.extend(
                resolved
                    .paths
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned()),
            ),
        }
    }
    entries.retain(|e| !e.trim().is_empty());
    entries.join(classpath_separator())
}

fn classpath_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
