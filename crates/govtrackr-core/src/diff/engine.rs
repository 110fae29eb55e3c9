//! Structural diff computation engine.
//!
//! [`diff`] compares two snapshots field by field and returns a tree of
//! [`DiffEntry`]; [`compute_diff`] wraps that tree in a [`SnapshotDiff`]
//! report with digests and counts.
//!
//! ## Policies
//!
//! - **Key order**: the left snapshot's keys in order, then keys present
//!   only on the right in the right's order.
//! - **Arrays** are compared positionally: index `i` on the left against
//!   index `i` on the right, up to the longer length. Insertions shift later
//!   indices; no alignment is attempted.
//! - **One-sided containers** (an object or array only one side has) are
//!   expanded so every nested key appears as `Added` or `Removed`.
//! - **Type-kind mismatch** (object vs array, container vs primitive) is a
//!   whole-field `Modified` leaf with a `TypeKindMismatch` issue.
//! - **Depth guard**: containers whose children would sit deeper than
//!   `max_depth` segments are not expanded; they become leaves with a
//!   `MaxDepthExceeded` issue.
//!
//! With `fail_fast` set, the first issue aborts the diff instead.

use crate::config::DiffOptions;
use crate::diff::model::{
    DiffClassification, DiffEntry, DiffIdentity, DiffIssue, DiffKind, DiffStats, PathSegment,
    RenderedValue, SnapshotDiff,
};
use crate::errors::{DiffError, ExError};
use crate::snapshot::canonical::{canonical_digest, same_value};
use crate::snapshot::display::{display_shape, display_value};
use crate::snapshot::{Fields, Snapshot, SnapshotValue, ValueKind};
use crate::{log_diff_issue, log_op_end, log_op_error, log_op_start};
use std::collections::{HashMap, HashSet};

/// Compare two snapshots with default options.
///
/// # Errors
///
/// Never fails with default options; see [`diff_with_options`].
pub fn diff(left: &Snapshot, right: &Snapshot) -> Result<Vec<DiffEntry>, ExError> {
    diff_with_options(left, right, &DiffOptions::default())
}

/// Compare two snapshots field by field.
///
/// # Errors
///
/// - `InvalidConfig` — `options` fail validation
/// - `TypeKindMismatch`, `MaxDepthExceeded` — only when `options.fail_fast`
///   is set; otherwise these are recorded on the affected entry
pub fn diff_with_options(
    left: &Snapshot,
    right: &Snapshot,
    options: &DiffOptions,
) -> Result<Vec<DiffEntry>, ExError> {
    options.validate()?;
    let walker = Walker { options };
    walker.compare_fields(Some(left.fields()), Some(right.fields()), "", 1)
}

/// Compute a full [`SnapshotDiff`] report.
///
/// # Errors
///
/// Same as [`diff_with_options`].
pub fn compute_diff(
    left: &Snapshot,
    right: &Snapshot,
    options: &DiffOptions,
) -> Result<SnapshotDiff, ExError> {
    log_op_start!(
        "compute_diff",
        left_fields = left.len(),
        right_fields = right.len()
    );
    let start = std::time::Instant::now();

    let entries = diff_with_options(left, right, options).map_err(|e| {
        log_op_error!(
            "compute_diff",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    let stats = DiffStats::from_entries(&entries);
    let classification = if stats.changed() == 0 {
        DiffClassification::Identical
    } else {
        DiffClassification::Changed
    };

    log_op_end!(
        "compute_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        entry_count = entries.len(),
        changed_count = stats.changed()
    );

    Ok(SnapshotDiff {
        diff_schema_version: 1,
        identity: DiffIdentity {
            left_digest: canonical_digest(left),
            right_digest: canonical_digest(right),
        },
        classification,
        stats,
        entries,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

struct Walker<'o> {
    options: &'o DiffOptions,
}

impl Walker<'_> {
    /// Compare two keyed records (either may be absent) found at `parent`.
    fn compare_fields(
        &self,
        left: Option<&Fields>,
        right: Option<&Fields>,
        parent: &str,
        depth: usize,
    ) -> Result<Vec<DiffEntry>, ExError> {
        let left_index: HashMap<&str, &SnapshotValue> =
            left.map(|f| f.iter().collect()).unwrap_or_default();
        let right_index: HashMap<&str, &SnapshotValue> =
            right.map(|f| f.iter().collect()).unwrap_or_default();

        let mut keys: Vec<&str> = left.map(|f| f.keys().collect()).unwrap_or_default();
        let known: HashSet<&str> = keys.iter().copied().collect();
        if let Some(right) = right {
            keys.extend(right.keys().filter(|k| !known.contains(k)));
        }

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let segment = PathSegment::Key(key.to_string());
            let lv = left_index.get(key).copied();
            let rv = right_index.get(key).copied();
            if let Some(entry) = self.compare_slot(segment, parent, lv, rv, depth)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Compare two sequences (either may be absent) positionally.
    fn compare_items(
        &self,
        left: Option<&[SnapshotValue]>,
        right: Option<&[SnapshotValue]>,
        parent: &str,
        depth: usize,
    ) -> Result<Vec<DiffEntry>, ExError> {
        let left = left.unwrap_or_default();
        let right = right.unwrap_or_default();
        let len = left.len().max(right.len());

        let mut entries = Vec::with_capacity(len);
        for i in 0..len {
            let entry =
                self.compare_slot(PathSegment::Index(i), parent, left.get(i), right.get(i), depth)?;
            entries.extend(entry);
        }
        Ok(entries)
    }

    fn compare_slot(
        &self,
        segment: PathSegment,
        parent: &str,
        lv: Option<&SnapshotValue>,
        rv: Option<&SnapshotValue>,
        depth: usize,
    ) -> Result<Option<DiffEntry>, ExError> {
        let path = segment.join_to(parent);
        let entry = match (lv, rv) {
            // Unreachable from the key union
            (None, None) => return Ok(None),
            (None, Some(r)) => self.one_sided(segment, path, r, Side::Right, depth)?,
            (Some(l), None) => self.one_sided(segment, path, l, Side::Left, depth)?,
            (Some(l), Some(r)) => match (l.kind(), r.kind()) {
                (ValueKind::Primitive, ValueKind::Primitive) => {
                    let kind = if same_value(l, r) {
                        DiffKind::Unchanged
                    } else {
                        DiffKind::Modified
                    };
                    leaf(segment, path, kind, Some(l), Some(r), None)
                }
                (ValueKind::Object, ValueKind::Object) | (ValueKind::Array, ValueKind::Array) => {
                    self.grouping(segment, path, l, r, depth)?
                }
                (left_kind, right_kind) => {
                    self.type_kind_mismatch(segment, path, l, r, left_kind, right_kind)?
                }
            },
        };
        Ok(Some(entry))
    }

    /// Both sides hold the same container kind: recurse and derive the kind
    /// from the children.
    fn grouping(
        &self,
        segment: PathSegment,
        path: String,
        l: &SnapshotValue,
        r: &SnapshotValue,
        depth: usize,
    ) -> Result<DiffEntry, ExError> {
        if depth >= self.options.max_depth && (l.child_count() > 0 || r.child_count() > 0) {
            self.check_depth(&path)?;
            let kind = if same_value(l, r) {
                DiffKind::Unchanged
            } else {
                DiffKind::Modified
            };
            let issue = DiffIssue::MaxDepthExceeded {
                limit: self.options.max_depth,
            };
            return Ok(shape_leaf(segment, path, kind, Some(l), Some(r), issue));
        }

        let children = match (l, r) {
            (SnapshotValue::Object(a), SnapshotValue::Object(b)) => {
                self.compare_fields(Some(a), Some(b), &path, depth + 1)?
            }
            (SnapshotValue::Array(a), SnapshotValue::Array(b)) => {
                self.compare_items(Some(a), Some(b), &path, depth + 1)?
            }
            _ => Vec::new(),
        };

        if children.is_empty() {
            // Two empty containers of the same kind
            return Ok(leaf(segment, path, DiffKind::Unchanged, Some(l), Some(r), None));
        }

        let kind = if children.iter().any(DiffEntry::is_changed) {
            DiffKind::Modified
        } else {
            DiffKind::Unchanged
        };
        Ok(DiffEntry {
            path,
            segment,
            kind,
            left_value: RenderedValue::Present(display_shape(l)),
            right_value: RenderedValue::Present(display_shape(r)),
            left_raw: None,
            right_raw: None,
            children,
            issue: None,
        })
    }

    /// The key exists on one side only. Non-empty containers are expanded so
    /// every nested key is reported.
    fn one_sided(
        &self,
        segment: PathSegment,
        path: String,
        value: &SnapshotValue,
        side: Side,
        depth: usize,
    ) -> Result<DiffEntry, ExError> {
        let kind = match side {
            Side::Left => DiffKind::Removed,
            Side::Right => DiffKind::Added,
        };
        let (lv, rv) = match side {
            Side::Left => (Some(value), None),
            Side::Right => (None, Some(value)),
        };

        if value.child_count() == 0 {
            return Ok(leaf(segment, path, kind, lv, rv, None));
        }

        if depth >= self.options.max_depth {
            self.check_depth(&path)?;
            let issue = DiffIssue::MaxDepthExceeded {
                limit: self.options.max_depth,
            };
            return Ok(shape_leaf(segment, path, kind, lv, rv, issue));
        }

        let children = match value {
            SnapshotValue::Object(fields) => {
                let (l, r) = match side {
                    Side::Left => (Some(fields), None),
                    Side::Right => (None, Some(fields)),
                };
                self.compare_fields(l, r, &path, depth + 1)?
            }
            SnapshotValue::Array(items) => {
                let (l, r) = match side {
                    Side::Left => (Some(items.as_slice()), None),
                    Side::Right => (None, Some(items.as_slice())),
                };
                self.compare_items(l, r, &path, depth + 1)?
            }
            _ => Vec::new(),
        };

        Ok(DiffEntry {
            path,
            segment,
            kind,
            left_value: lv.map_or(RenderedValue::Absent, |v| {
                RenderedValue::Present(display_shape(v))
            }),
            right_value: rv.map_or(RenderedValue::Absent, |v| {
                RenderedValue::Present(display_shape(v))
            }),
            left_raw: None,
            right_raw: None,
            children,
            issue: None,
        })
    }

    fn type_kind_mismatch(
        &self,
        segment: PathSegment,
        path: String,
        l: &SnapshotValue,
        r: &SnapshotValue,
        left_kind: ValueKind,
        right_kind: ValueKind,
    ) -> Result<DiffEntry, ExError> {
        if self.options.fail_fast {
            return Err(DiffError::TypeKindMismatch {
                path,
                left: left_kind,
                right: right_kind,
            }
            .into());
        }
        let issue = DiffIssue::TypeKindMismatch {
            left: left_kind,
            right: right_kind,
        };
        log_diff_issue!(path, left_kind = %left_kind, right_kind = %right_kind);
        Ok(leaf(segment, path, DiffKind::Modified, Some(l), Some(r), Some(issue)))
    }

    /// Abort under fail-fast, otherwise log the overflow and carry on.
    fn check_depth(&self, path: &str) -> Result<(), ExError> {
        if self.options.fail_fast {
            return Err(DiffError::MaxDepthExceeded {
                path: path.to_string(),
                limit: self.options.max_depth,
            }
            .into());
        }
        log_diff_issue!(path, limit = self.options.max_depth);
        Ok(())
    }
}

/// Leaf entry with full display text for both sides.
fn leaf(
    segment: PathSegment,
    path: String,
    kind: DiffKind,
    lv: Option<&SnapshotValue>,
    rv: Option<&SnapshotValue>,
    issue: Option<DiffIssue>,
) -> DiffEntry {
    DiffEntry {
        path,
        segment,
        kind,
        left_value: render(lv, display_value),
        right_value: render(rv, display_value),
        left_raw: lv.cloned(),
        right_raw: rv.cloned(),
        children: Vec::new(),
        issue,
    }
}

/// Leaf entry for a subtree past the depth bound: shape labels only, since
/// the full text could be arbitrarily large.
fn shape_leaf(
    segment: PathSegment,
    path: String,
    kind: DiffKind,
    lv: Option<&SnapshotValue>,
    rv: Option<&SnapshotValue>,
    issue: DiffIssue,
) -> DiffEntry {
    DiffEntry {
        path,
        segment,
        kind,
        left_value: render(lv, display_shape),
        right_value: render(rv, display_shape),
        left_raw: lv.cloned(),
        right_raw: rv.cloned(),
        children: Vec::new(),
        issue: Some(issue),
    }
}

fn render(value: Option<&SnapshotValue>, text: fn(&SnapshotValue) -> String) -> RenderedValue {
    value.map_or(RenderedValue::Absent, |v| RenderedValue::Present(text(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snap(value: serde_json::Value) -> Snapshot {
        Snapshot::try_from(value).unwrap()
    }

    #[test]
    fn test_right_only_keys_follow_left_keys() {
        let left = snap(json!({"b": 1, "a": 1}));
        let right = snap(json!({"c": 1, "a": 1, "d": 1}));
        let entries = diff(&left, &right).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_empty_snapshots_yield_no_entries() {
        let entries = diff(&Snapshot::new(), &Snapshot::new()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_empty_containers_are_unchanged_leaves() {
        let entries = diff(&snap(json!({"tags": []})), &snap(json!({"tags": []}))).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Unchanged);
        assert!(entries[0].is_leaf());
        assert_eq!(entries[0].right_raw, Some(SnapshotValue::Array(vec![])));
    }

    #[test]
    fn test_one_sided_object_is_expanded() {
        let entries = diff(
            &snap(json!({})),
            &snap(json!({"office": {"title": "Mayor", "years": [2020]}})),
        )
        .unwrap();
        let office = &entries[0];
        assert_eq!(office.kind, DiffKind::Added);
        assert_eq!(office.left_value, RenderedValue::Absent);
        assert_eq!(office.right_value, RenderedValue::Present("{2 fields}".into()));
        let paths: Vec<&str> = office.walk().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["office", "office.title", "office.years", "office.years[0]"]
        );
        assert!(office.walk().all(|e| e.kind == DiffKind::Added));
    }

    #[test]
    fn test_depth_guard_at_limit_one() {
        let options = DiffOptions::default().with_max_depth(1);
        let entries = diff_with_options(
            &snap(json!({"a": {"b": 1}, "c": 2})),
            &snap(json!({"a": {"b": 2}, "c": 2})),
            &options,
        )
        .unwrap();
        assert_eq!(entries[0].kind, DiffKind::Modified);
        assert_eq!(
            entries[0].issue,
            Some(DiffIssue::MaxDepthExceeded { limit: 1 })
        );
        assert!(entries[0].is_leaf());
        assert_eq!(entries[1].kind, DiffKind::Unchanged);
        assert!(entries[1].issue.is_none());
    }

    fn deep_chain(depth: usize) -> SnapshotValue {
        let mut value = SnapshotValue::Int(0);
        for _ in 0..depth {
            value = SnapshotValue::Array(vec![value]);
        }
        value
    }

    // The derived Drop recurses; unwind the chain by hand.
    fn unwind(value: Option<SnapshotValue>) {
        let mut current = value.unwrap_or(SnapshotValue::Null);
        while let SnapshotValue::Array(mut items) = current {
            current = items.pop().unwrap_or(SnapshotValue::Null);
        }
    }

    fn take_capped(entries: &mut [DiffEntry]) -> (Option<SnapshotValue>, Option<SnapshotValue>) {
        let mut entry = &mut entries[0];
        while !entry.children.is_empty() {
            entry = &mut entry.children[0];
        }
        assert_eq!(
            entry.issue,
            Some(DiffIssue::MaxDepthExceeded {
                limit: crate::config::DEFAULT_MAX_DEPTH
            })
        );
        (entry.left_raw.take(), entry.right_raw.take())
    }

    #[test]
    fn test_depth_guard_survives_very_deep_one_sided_input() {
        let left = Snapshot::new().with("a", deep_chain(200_000));

        let mut entries = diff(&left, &Snapshot::new()).unwrap();

        let capped_path = format!("a{}", "[0]".repeat(crate::config::DEFAULT_MAX_DEPTH - 1));
        let capped = walk_capped_path(&entries);
        assert_eq!(capped.0, capped_path);
        assert_eq!(capped.1, DiffKind::Removed);
        let (left_raw, right_raw) = take_capped(&mut entries);
        assert!(right_raw.is_none());
        unwind(left_raw);

        let mut fields = left.into_fields();
        unwind(fields.insert("a", SnapshotValue::Null));
    }

    #[test]
    fn test_depth_guard_survives_very_deep_input_on_both_sides() {
        let left = Snapshot::new().with("a", deep_chain(200_000));

        let mut entries = diff(&left, &left).unwrap();

        assert_eq!(walk_capped_path(&entries).1, DiffKind::Unchanged);
        let (left_raw, right_raw) = take_capped(&mut entries);
        unwind(left_raw);
        unwind(right_raw);

        let mut fields = left.into_fields();
        unwind(fields.insert("a", SnapshotValue::Null));
    }

    fn walk_capped_path(entries: &[DiffEntry]) -> (String, DiffKind) {
        let mut entry = &entries[0];
        while let Some(child) = entry.children.first() {
            entry = child;
        }
        (entry.path.clone(), entry.kind)
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = DiffOptions::default().with_max_depth(0);
        let err = diff_with_options(&Snapshot::new(), &Snapshot::new(), &options).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::InvalidConfig);
    }
}
