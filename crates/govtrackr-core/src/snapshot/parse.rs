//! Parsing raw snapshot bytes.

use crate::errors::{ExError, ExErrorKind};
use crate::snapshot::value::Snapshot;

/// Parse raw bytes into a [`Snapshot`].
///
/// Object keys keep their document order.
///
/// # Errors
///
/// - `InvalidSnapshot` — bytes are not valid UTF-8, not valid JSON, or the
///   JSON root is not an object
pub fn parse_snapshot_bytes(bytes: &[u8]) -> Result<Snapshot, ExError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("snapshot is not valid UTF-8: {}", e))
    })?;

    let raw: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("snapshot is not valid JSON: {}", e))
    })?;

    if !raw.is_object() {
        return Err(ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("parse_snapshot_bytes")
            .with_message("snapshot JSON root must be an object"));
    }

    Snapshot::try_from(raw)
}
