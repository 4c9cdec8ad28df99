//! Library identifiers and provider-tagged coordinates.

use std::fmt;
use std::path::PathBuf;

use depot_util::errors::{DepotError, DepotResult};
use serde::{Deserialize, Serialize};

/// A library identifier: a namespace (group) and a local name.
///
/// Rendered and parsed as `group/name`. A name may carry a `$` classifier
/// suffix (`com.example/core$natives`); exclusion matching ignores the
/// suffix and compares base names only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lib {
    group: String,
    name: String,
}

impl Lib {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse `"group/name"`. Bare names without a namespace are rejected.
    pub fn parse(s: &str) -> DepotResult<Self> {
        match s.split_once('/') {
            Some((group, name)) if !group.is_empty() && !name.is_empty() => {
                Ok(Self::new(group, name))
            }
            _ => Err(DepotError::config(format!(
                "invalid library identifier {s:?}: expected group/name"
            ))),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name with any `$` classifier suffix removed.
    pub fn base_name(&self) -> &str {
        match self.name.find('$') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }

    /// Classifier-insensitive equality: same group, same base name.
    pub fn matches_base(&self, other: &Lib) -> bool {
        self.group == other.group && self.base_name() == other.base_name()
    }
}

impl fmt::Display for Lib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.name)
    }
}

impl TryFrom<String> for Lib {
    type Error = DepotError;

    fn try_from(value: String) -> DepotResult<Self> {
        Self::parse(&value)
    }
}

impl From<Lib> for String {
    fn from(lib: Lib) -> String {
        lib.to_string()
    }
}

/// Where a coordinate's artifact and manifest come from.
///
/// A closed set: adding a provider means adding a variant here plus a
/// [`Provider`](crate::provider::Provider) implementation for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordSource {
    /// A repository artifact addressed by version, `{ mvn = "1.2.3" }`.
    Mvn {
        #[serde(rename = "mvn")]
        version: String,
    },
    /// A git repository pinned to a revision, `{ git = "...", rev = "..." }`.
    Git {
        #[serde(rename = "git")]
        url: String,
        rev: String,
    },
    /// A directory on the local filesystem, `{ local = "../lib" }`.
    Local {
        #[serde(rename = "local")]
        path: PathBuf,
    },
}

impl fmt::Display for CoordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordSource::Mvn { version } => write!(f, "mvn:{version}"),
            CoordSource::Git { url, rev } => write!(f, "git:{url}@{rev}"),
            CoordSource::Local { path } => write!(f, "local:{}", path.display()),
        }
    }
}

/// Manifest formats a provider may read to discover dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    /// A `Depot.toml` deps file.
    Depot,
    /// A Maven `pom.xml`.
    Pom,
}

/// A provider-tagged description of a library version or source location.
///
/// The resolution core treats the `source` opaquely and delegates all
/// interpretation to the provider; only `exclusions`, `manifest`, and
/// `root` are read by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    #[serde(flatten)]
    pub source: CoordSource,

    /// Libraries suppressed transitively under this edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Lib>,

    /// How dependencies are discovered for this coord. Detected by the
    /// provider when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestKind>,

    /// Directory treated as the current directory while reading this
    /// coord's manifest; providers resolve relative local roots against it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl Coord {
    pub fn new(source: CoordSource) -> Self {
        Self {
            source,
            exclusions: Vec::new(),
            manifest: None,
            root: None,
        }
    }

    pub fn mvn(version: impl Into<String>) -> Self {
        Self::new(CoordSource::Mvn {
            version: version.into(),
        })
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::new(CoordSource::Local { path: path.into() })
    }

    pub fn git(url: impl Into<String>, rev: impl Into<String>) -> Self {
        Self::new(CoordSource::Git {
            url: url.into(),
            rev: rev.into(),
        })
    }

    pub fn with_exclusions(mut self, exclusions: Vec<Lib>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_manifest(mut self, manifest: ManifestKind) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source.fmt(f)
    }
}

/// Provider-assigned identity collapsing logically equivalent coordinates.
///
/// Two coords with the same `CoordId` are the same version as far as
/// conflict resolution is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordId(String);

impl CoordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_splits_on_dollar() {
        let lib = Lib::parse("com.example/core$natives").unwrap();
        assert_eq!(lib.name(), "core$natives");
        assert_eq!(lib.base_name(), "core");
    }

    #[test]
    fn matches_base_ignores_classifier() {
        let plain = Lib::parse("com.example/core").unwrap();
        let classified = Lib::parse("com.example/core$natives").unwrap();
        let other = Lib::parse("com.example/io").unwrap();
        assert!(plain.matches_base(&classified));
        assert!(classified.matches_base(&plain));
        assert!(!plain.matches_base(&other));
    }

    #[test]
    fn coord_display() {
        assert_eq!(Coord::mvn("1.2.3").to_string(), "mvn:1.2.3");
        assert_eq!(
            Coord::git("https://example.com/r.git", "abc123").to_string(),
            "git:https://example.com/r.git@abc123"
        );
    }
}
