use depot_core::dependency::{Coord, CoordSource, Lib, ManifestKind};
use depot_core::manifest::DepsFile;

fn lib(s: &str) -> Lib {
    Lib::parse(s).unwrap()
}

#[test]
fn parse_minimal() {
    let file = DepsFile::parse_toml(
        r#"
[deps]
"org.clojure/clojure" = { mvn = "1.12.0" }
"#,
    )
    .unwrap();
    assert_eq!(file.deps.len(), 1);
    assert_eq!(file.deps[0].0, lib("org.clojure/clojure"));
    assert_eq!(file.deps[0].1, Coord::mvn("1.12.0"));
}

#[test]
fn parse_preserves_dep_order() {
    let file = DepsFile::parse_toml(
        r#"
[deps]
"z.group/zeta" = { mvn = "1.0" }
"a.group/alpha" = { mvn = "2.0" }
"m.group/mid" = { mvn = "3.0" }
"#,
    )
    .unwrap();
    let names: Vec<String> = file.deps.iter().map(|(l, _)| l.to_string()).collect();
    assert_eq!(names, ["z.group/zeta", "a.group/alpha", "m.group/mid"]);
}

#[test]
fn parse_coord_forms() {
    let file = DepsFile::parse_toml(
        r#"
[deps]
"org.example/from-repo" = { mvn = "0.3.1" }
"org.example/from-disk" = { local = "../disk", manifest = "depot" }
"org.example/from-git" = { git = "https://example.com/r.git", rev = "deadbeef" }
"#,
    )
    .unwrap();
    assert!(matches!(file.deps[0].1.source, CoordSource::Mvn { .. }));
    assert!(matches!(file.deps[1].1.source, CoordSource::Local { .. }));
    assert_eq!(file.deps[1].1.manifest, Some(ManifestKind::Depot));
    assert!(matches!(
        file.deps[2].1.source,
        CoordSource::Git { ref rev, .. } if rev == "deadbeef"
    ));
}

#[test]
fn parse_exclusions() {
    let file = DepsFile::parse_toml(
        r#"
[deps]
"org.example/chatty" = { mvn = "2.0", exclusions = ["org.example/logger"] }
"#,
    )
    .unwrap();
    assert_eq!(file.deps[0].1.exclusions, vec![lib("org.example/logger")]);
}

#[test]
fn parse_invalid_lib_key_fails() {
    let result = DepsFile::parse_toml(
        r#"
[deps]
"not-namespaced" = { mvn = "1.0" }
"#,
    );
    assert!(result.is_err());
}

#[test]
fn parse_repos_and_paths() {
    let file = DepsFile::parse_toml(
        r#"
paths = ["src", "resources"]

[deps]
"org.example/a" = { mvn = "1.0" }

[repos]
central = "https://repo1.maven.org/maven2/"
"#,
    )
    .unwrap();
    assert_eq!(file.paths, ["src", "resources"]);
    assert_eq!(
        file.config.repos.get("central").map(String::as_str),
        Some("https://repo1.maven.org/maven2/")
    );
}

#[test]
fn parse_aliases() {
    let file = DepsFile::parse_toml(
        r#"
[deps]
"org.example/a" = { mvn = "1.0" }

[aliases.dev]
extra-deps = { "org.example/devtools" = { mvn = "0.9.0" } }
jvm-opts = ["-Xmx1g"]

[aliases.bench]
main-opts = ["-m", "bench.core"]
"#,
    )
    .unwrap();
    let dev = file.aliases.get("dev").unwrap();
    assert_eq!(dev.args.extra_deps.len(), 1);
    assert_eq!(dev.args.jvm_opts, ["-Xmx1g"]);
    assert!(dev.unknown.is_empty());
    let bench = file.aliases.get("bench").unwrap();
    assert_eq!(bench.args.main_opts, ["-m", "bench.core"]);
}

#[test]
fn parse_alias_captures_unknown_keys() {
    let file = DepsFile::parse_toml(
        r#"
[aliases.broken]
extra-deps = { "org.example/x" = { mvn = "1.0" } }
not-a-real-key = true
"#,
    )
    .unwrap();
    let broken = file.aliases.get("broken").unwrap();
    assert!(broken.unknown.contains_key("not-a-real-key"));
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Depot.toml");
    std::fs::write(
        &path,
        r#"
[deps]
"org.example/a" = { mvn = "1.0" }
"#,
    )
    .unwrap();
    let file = DepsFile::from_path(&path).unwrap();
    assert_eq!(file.deps.len(), 1);
}

#[test]
fn from_path_missing_file_is_io_error() {
    let err = DepsFile::from_path(std::path::Path::new("/nonexistent/Depot.toml")).unwrap_err();
    assert!(matches!(err, depot_util::errors::DepotError::Io(_)));
}
