//! Structural diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` so
//! a diff can be shipped as JSON to whatever renders it. Raw values carrying
//! non-finite floats serialize them as `null` and do not round-trip.

use crate::snapshot::{SnapshotValue, ValueKind};
use serde::{Deserialize, Serialize};

/// Text shown for a side where the field does not exist.
pub const NOT_PRESENT: &str = "not present";

/// Classification of one field at one path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Unchanged,
    /// Absent on the left, present on the right
    Added,
    /// Present on the left, absent on the right
    Removed,
    Modified,
}

impl DiffKind {
    /// The classification seen from the other direction
    pub fn mirrored(self) -> Self {
        match self {
            DiffKind::Added => DiffKind::Removed,
            DiffKind::Removed => DiffKind::Added,
            other => other,
        }
    }
}

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Append this segment to a rendered parent path.
    ///
    /// Keys join with `.`, indices use brackets: `positions[0].title`.
    pub fn join_to(&self, parent: &str) -> String {
        match self {
            PathSegment::Key(key) if parent.is_empty() => key.clone(),
            PathSegment::Key(key) => format!("{}.{}", parent, key),
            PathSegment::Index(i) => format!("{}[{}]", parent, i),
        }
    }
}

/// Display text for one side of an entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum RenderedValue {
    /// The key does not exist on this side
    Absent,
    Present(String),
}

impl RenderedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, RenderedValue::Absent)
    }

    /// Text to show, with [`NOT_PRESENT`] standing in for absence
    pub fn as_text(&self) -> &str {
        match self {
            RenderedValue::Absent => NOT_PRESENT,
            RenderedValue::Present(text) => text,
        }
    }
}

impl std::fmt::Display for RenderedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Why a subtree was not compared structurally.
///
/// The entry carrying an issue is always a leaf with both raw sides kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DiffIssue {
    /// Incompatible shapes: reported as a whole-field `Modified`
    TypeKindMismatch { left: ValueKind, right: ValueKind },
    /// Nesting reached the configured bound; classified by deep equality
    MaxDepthExceeded { limit: usize },
}

/// Comparison result for one field path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffEntry {
    /// Dot-delimited location, e.g. `contactInfo.email` or `positions[0].title`
    pub path: String,
    /// Last step of `path`
    pub segment: PathSegment,
    pub kind: DiffKind,
    pub left_value: RenderedValue,
    pub right_value: RenderedValue,
    /// Raw left value; set on leaf entries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_raw: Option<SnapshotValue>,
    /// Raw right value; set on leaf entries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_raw: Option<SnapshotValue>,
    /// Nested entries for grouping (object/array) fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DiffEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<DiffIssue>,
}

impl DiffEntry {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.kind != DiffKind::Unchanged
    }

    /// Pre-order walk over this entry and all its descendants
    pub fn walk(&self) -> EntryWalk<'_> {
        EntryWalk { stack: vec![self] }
    }
}

/// Pre-order walk over every entry in a list of trees.
pub fn walk_entries(entries: &[DiffEntry]) -> EntryWalk<'_> {
    EntryWalk {
        stack: entries.iter().rev().collect(),
    }
}

/// Iterator returned by [`DiffEntry::walk`] and [`walk_entries`].
pub struct EntryWalk<'a> {
    stack: Vec<&'a DiffEntry>,
}

impl<'a> Iterator for EntryWalk<'a> {
    type Item = &'a DiffEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.stack.extend(entry.children.iter().rev());
        Some(entry)
    }
}

/// The top-level report produced by `compute_diff`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotDiff {
    /// Schema version of this structure (always 1)
    pub diff_schema_version: u32,
    pub identity: DiffIdentity,
    pub classification: DiffClassification,
    pub stats: DiffStats,
    pub entries: Vec<DiffEntry>,
}

/// Canonical digests of both sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffIdentity {
    pub left_digest: String,
    pub right_digest: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiffClassification {
    /// Every leaf is `Unchanged`
    Identical,
    /// At least one leaf is added, removed or modified
    Changed,
}

/// Leaf counts. Grouping entries are not counted; an entry with an issue
/// counts under its kind and under `issues`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub issues: usize,
}

impl DiffStats {
    pub fn from_entries(entries: &[DiffEntry]) -> Self {
        let mut stats = DiffStats::default();
        for entry in walk_entries(entries).filter(|e| e.is_leaf()) {
            match entry.kind {
                DiffKind::Added => stats.added += 1,
                DiffKind::Removed => stats.removed += 1,
                DiffKind::Modified => stats.modified += 1,
                DiffKind::Unchanged => stats.unchanged += 1,
            }
            if entry.issue.is_some() {
                stats.issues += 1;
            }
        }
        stats
    }

    pub fn changed(&self) -> usize {
        self.added + self.removed + self.modified
    }
}
