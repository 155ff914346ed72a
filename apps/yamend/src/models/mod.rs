//! Shared data models for normalization results and run reporting.

pub mod summary;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// The fixed set of transformations that can alter a file.
pub enum FixKind {
    TrailingSpaces,
    NewlineEof,
    DocumentStart,
    CommentSpacing,
    Indentation,
    YamlStructure,
}

const KIND_COUNT: usize = 6;

impl FixKind {
    /// Every kind, in report order.
    pub const ALL: [FixKind; KIND_COUNT] = [
        FixKind::TrailingSpaces,
        FixKind::NewlineEof,
        FixKind::DocumentStart,
        FixKind::CommentSpacing,
        FixKind::Indentation,
        FixKind::YamlStructure,
    ];

    /// Stable identifier used in JSON output and logs.
    pub fn key(self) -> &'static str {
        match self {
            FixKind::TrailingSpaces => "trailing_spaces",
            FixKind::NewlineEof => "newline_eof",
            FixKind::DocumentStart => "document_start",
            FixKind::CommentSpacing => "comment_spacing",
            FixKind::Indentation => "indentation",
            FixKind::YamlStructure => "yaml_structure",
        }
    }

    /// Human-readable label for summaries.
    pub fn description(self) -> &'static str {
        match self {
            FixKind::TrailingSpaces => "Trailing spaces removed",
            FixKind::NewlineEof => "Missing newlines at EOF added",
            FixKind::DocumentStart => "Document start markers (---) added",
            FixKind::CommentSpacing => "Comment spacing fixed",
            FixKind::Indentation => "Indentation issues fixed",
            FixKind::YamlStructure => "YAML structure issues fixed",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Per-file count of altered lines, grouped by `FixKind`.
pub struct ChangeTally {
    counts: [usize; KIND_COUNT],
}

impl ChangeTally {
    pub fn add(&mut self, kind: FixKind, n: usize) {
        self.counts[kind as usize] += n;
    }

    pub fn get(&self, kind: FixKind) -> usize {
        self.counts[kind as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// True when no transformation altered anything.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero entries in report order.
    pub fn iter(&self) -> impl Iterator<Item = (FixKind, usize)> + '_ {
        FixKind::ALL
            .into_iter()
            .map(|k| (k, self.get(k)))
            .filter(|(_, n)| *n > 0)
    }
}

impl Serialize for ChangeTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(KIND_COUNT))?;
        for kind in FixKind::ALL {
            map.serialize_entry(kind.key(), &self.get(kind))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// A line flagged by the length advisory pass. `line` is 1-based.
pub struct LongLine {
    pub line: usize,
    pub width: usize,
}
