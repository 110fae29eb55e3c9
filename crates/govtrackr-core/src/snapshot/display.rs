//! Display-safe text for snapshot values.

use crate::snapshot::canonical::{compact_string, number_text, KeyOrder};
use crate::snapshot::value::SnapshotValue;

/// Render a value for a side-by-side view.
///
/// Strings render without quotes, numbers JS-style, containers as compact
/// JSON in document key order.
pub fn display_value(value: &SnapshotValue) -> String {
    match value {
        SnapshotValue::Null => "null".to_string(),
        SnapshotValue::Bool(b) => b.to_string(),
        SnapshotValue::Int(i) => i.to_string(),
        SnapshotValue::Float(f) => number_text(*f),
        SnapshotValue::String(s) => s.clone(),
        SnapshotValue::Object(_) | SnapshotValue::Array(_) => {
            compact_string(value, KeyOrder::Document)
        }
    }
}

/// Short shape label for a container (`{2 fields}`, `[3 items]`).
///
/// Primitives fall back to [`display_value`].
pub fn display_shape(value: &SnapshotValue) -> String {
    match value {
        SnapshotValue::Object(fields) => match fields.len() {
            1 => "{1 field}".to_string(),
            n => format!("{{{} fields}}", n),
        },
        SnapshotValue::Array(items) => match items.len() {
            1 => "[1 item]".to_string(),
            n => format!("[{} items]", n),
        },
        primitive => display_value(primitive),
    }
}
