//! Include-decision recording for resolution runs.

use std::fmt;

use depot_core::dependency::{Coord, CoordId, Lib};

/// Why a node was included in or omitted from the expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NewTopDep,
    NewDep,
    NewerVersion,
    SameVersion,
    OlderVersion,
    Excluded,
    UseTop,
    ParentOmitted,
}

impl Reason {
    /// Whether this reason admits the node into the version map selection.
    pub fn includes(self) -> bool {
        matches!(self, Reason::NewTopDep | Reason::NewDep | Reason::NewerVersion)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::NewTopDep => "new-top-dep",
            Reason::NewDep => "new-dep",
            Reason::NewerVersion => "newer-version",
            Reason::SameVersion => "same-version",
            Reason::OlderVersion => "older-version",
            Reason::Excluded => "excluded",
            Reason::UseTop => "use-top",
            Reason::ParentOmitted => "parent-omitted",
        };
        f.write_str(s)
    }
}

/// One include decision made by the expansion loop.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    /// Parent chain of the node under consideration.
    pub path: Vec<Lib>,
    pub lib: Lib,
    /// The coordinate the edge itself declared, if any.
    pub coord: Option<Coord>,
    /// The effective coordinate after override/default substitution and
    /// manifest detection.
    pub use_coord: Coord,
    pub coord_id: CoordId,
    /// Set when `override-deps` replaced the edge's coordinate.
    pub override_coord: Option<Coord>,
    pub include: bool,
    pub reason: Reason,
}

/// Ordered log of every include decision made during expansion.
#[derive(Debug, Default)]
pub struct TraceLog {
    pub entries: Vec<TraceEntry>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for TraceLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "No expansion steps.");
        }
        writeln!(f, "Expansion steps ({}):", self.entries.len())?;
        for e in &self.entries {
            let path = e
                .path
                .iter()
                .map(Lib::to_string)
                .collect::<Vec<_>>()
                .join(" > ");
            let marker = if e.include { "+" } else { "-" };
            writeln!(
                f,
                "  {marker} {} {} ({}) at [{path}]",
                e.lib, e.use_coord, e.reason
            )?;
        }
        Ok(())
    }
}
