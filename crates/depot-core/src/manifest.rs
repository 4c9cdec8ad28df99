//! Deps-file (`Depot.toml`) parsing.

use std::collections::BTreeMap;
use std::path::Path;

use depot_util::errors::{DepotError, DepotResult};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::config::{ArgsMap, ResolveConfig};
use crate::dependency::{Coord, Lib};

/// The parsed representation of a `Depot.toml` deps file.
///
/// ```toml
/// paths = ["src", "resources"]
///
/// [deps]
/// "org.clojure/clojure" = { mvn = "1.12.0" }
/// "com.example/widget" = { local = "../widget" }
///
/// [repos]
/// central = "https://repo1.maven.org/maven2/"
///
/// [aliases.dev]
/// extra-deps = { "com.example/devtools" = { mvn = "0.9.0" } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DepsFile {
    /// Top-level deps in declaration order. Order is significant: when
    /// two top deps conflict on the same lib, the first listed wins.
    #[serde(deserialize_with = "de_dep_list")]
    pub deps: Vec<(Lib, Coord)>,

    /// Source directories included on the classpath ahead of artifacts.
    pub paths: Vec<String>,

    /// Named argument fragments combinable via `combine_aliases`.
    pub aliases: BTreeMap<String, Alias>,

    /// Provider configuration (repositories, cache dir).
    #[serde(flatten)]
    pub config: ResolveConfig,
}

impl DepsFile {
    /// Parse a deps file from a string.
    pub fn parse_toml(content: &str) -> DepotResult<Self> {
        toml::from_str(content).map_err(|e| DepotError::Config {
            message: format!("failed to parse deps file: {e}"),
        })
    }

    /// Load and parse a deps file from the given path.
    pub fn from_path(path: &Path) -> DepotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}

/// One `[aliases.<name>]` table: a partial [`ArgsMap`] plus any keys the
/// schema does not recognize. Unknown keys are rejected when the alias is
/// combined, not at parse time, so unrelated aliases stay usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Alias {
    #[serde(flatten)]
    pub args: ArgsMap,

    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

/// Deserialize a TOML table of `lib -> coord` into an ordered list.
///
/// A plain map type would lose declaration order, and first-listed-wins
/// conflict resolution depends on it.
pub(crate) fn de_dep_list<'de, D>(deserializer: D) -> Result<Vec<(Lib, Coord)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct DepListVisitor;

    impl<'de> Visitor<'de> for DepListVisitor {
        type Value = Vec<(Lib, Coord)>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a table of library identifier to coordinate")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut deps = Vec::new();
            while let Some(entry) = map.next_entry::<Lib, Coord>()? {
                deps.push(entry);
            }
            Ok(deps)
        }
    }

    deserializer.deserialize_map(DepListVisitor)
}
