use depot_core::dependency::{Coord, CoordSource, Lib};

#[test]
fn lib_parse_valid() {
    let lib = Lib::parse("org.clojure/clojure").unwrap();
    assert_eq!(lib.group(), "org.clojure");
    assert_eq!(lib.name(), "clojure");
}

#[test]
fn lib_parse_bare_name_rejected() {
    assert!(Lib::parse("clojure").is_err());
}

#[test]
fn lib_parse_empty_parts_rejected() {
    assert!(Lib::parse("/name").is_err());
    assert!(Lib::parse("group/").is_err());
    assert!(Lib::parse("").is_err());
}

#[test]
fn lib_display_roundtrip() {
    let s = "com.example/my-lib";
    let lib = Lib::parse(s).unwrap();
    assert_eq!(lib.to_string(), s);
}

#[test]
fn lib_ordering_is_structural() {
    let a = Lib::parse("a.group/lib").unwrap();
    let b = Lib::parse("b.group/lib").unwrap();
    assert!(a < b);
}

#[test]
fn coord_builders() {
    let excl = Lib::parse("org.example/noisy").unwrap();
    let coord = Coord::mvn("1.2.3").with_exclusions(vec![excl.clone()]);
    assert_eq!(coord.exclusions, vec![excl]);
    assert!(matches!(coord.source, CoordSource::Mvn { ref version } if version == "1.2.3"));
    assert!(coord.manifest.is_none());
    assert!(coord.root.is_none());

    let local = Coord::local("../widget").with_root("/srv/project");
    assert_eq!(local.root.as_deref(), Some(std::path::Path::new("/srv/project")));
}

#[test]
fn coord_equality_includes_exclusions() {
    let plain = Coord::mvn("1.0");
    let with_excl =
        Coord::mvn("1.0").with_exclusions(vec![Lib::parse("org.example/noisy").unwrap()]);
    assert_ne!(plain, with_excl);
}
