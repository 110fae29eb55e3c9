use govtrackr_core::diff::{DiffEntry, DiffKind, PathSegment};
use govtrackr_core::snapshot::{Fields, Snapshot, SnapshotValue};
use serde_json::Value;

/// Build a snapshot from a JSON object literal
#[allow(dead_code)]
pub fn snap(value: Value) -> Snapshot {
    Snapshot::try_from(value).expect("test snapshot must be a JSON object")
}

/// Find an entry anywhere in the tree by its rendered path
#[allow(dead_code)]
pub fn find<'a>(entries: &'a [DiffEntry], path: &str) -> &'a DiffEntry {
    govtrackr_core::diff::walk_entries(entries)
        .find(|e| e.path == path)
        .unwrap_or_else(|| panic!("no entry at path {path}"))
}

/// Rebuild the right-hand snapshot from the left snapshot plus the diff.
///
/// Unchanged leaves are taken from `left`; added and modified leaves from
/// the entry's right raw value; removed entries are dropped.
#[allow(dead_code)]
pub fn rebuild_right(left: &Snapshot, entries: &[DiffEntry]) -> Snapshot {
    Snapshot::from(rebuild_fields(Some(left.fields()), entries))
}

fn rebuild_fields(left: Option<&Fields>, entries: &[DiffEntry]) -> Fields {
    let mut fields = Fields::new();
    for entry in entries {
        let PathSegment::Key(key) = &entry.segment else {
            panic!("object child with index segment at {}", entry.path);
        };
        let lv = left.and_then(|f| f.get(key));
        if let Some(value) = rebuild_value(lv, entry) {
            fields.insert(key.clone(), value);
        }
    }
    fields
}

fn rebuild_items(left: Option<&[SnapshotValue]>, entries: &[DiffEntry]) -> Vec<SnapshotValue> {
    let mut items = Vec::new();
    for entry in entries {
        let PathSegment::Index(i) = entry.segment else {
            panic!("array child with key segment at {}", entry.path);
        };
        let lv = left.and_then(|items| items.get(i));
        if let Some(value) = rebuild_value(lv, entry) {
            items.push(value);
        }
    }
    items
}

fn rebuild_value(left: Option<&SnapshotValue>, entry: &DiffEntry) -> Option<SnapshotValue> {
    if entry.kind == DiffKind::Removed {
        return None;
    }
    if entry.is_leaf() {
        return match entry.kind {
            DiffKind::Unchanged => left.cloned(),
            _ => entry.right_raw.clone(),
        };
    }
    match entry.children[0].segment {
        PathSegment::Index(_) => Some(SnapshotValue::Array(rebuild_items(
            left.and_then(SnapshotValue::as_array),
            &entry.children,
        ))),
        PathSegment::Key(_) => Some(SnapshotValue::Object(rebuild_fields(
            left.and_then(SnapshotValue::as_object),
            &entry.children,
        ))),
    }
}

/// Every path in a snapshot, containers included, in pre-order
#[allow(dead_code)]
pub fn all_paths(snapshot: &Snapshot) -> Vec<String> {
    let mut out = Vec::new();
    collect_field_paths(snapshot.fields(), "", &mut out);
    out
}

fn collect_field_paths(fields: &Fields, parent: &str, out: &mut Vec<String>) {
    for (key, value) in fields.iter() {
        let path = PathSegment::Key(key.to_string()).join_to(parent);
        collect_value_paths(value, path, out);
    }
}

fn collect_value_paths(value: &SnapshotValue, path: String, out: &mut Vec<String>) {
    out.push(path.clone());
    match value {
        SnapshotValue::Object(fields) => collect_field_paths(fields, &path, out),
        SnapshotValue::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_value_paths(item, PathSegment::Index(i).join_to(&path), out);
            }
        }
        _ => {}
    }
}
