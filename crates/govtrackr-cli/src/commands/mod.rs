pub mod diff;
pub mod digest;

use govtrackr_core::errors::{ExError, ExErrorKind};
use govtrackr_core::snapshot::{parse_snapshot_bytes, Snapshot};
use std::path::Path;

/// Read and parse a snapshot file
pub fn read_snapshot(path: &Path) -> Result<Snapshot, ExError> {
    let bytes = std::fs::read(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_snapshot")
            .with_message(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_snapshot_bytes(&bytes).map_err(|e| {
        let message = format!("{} ({})", e.message(), path.display());
        e.with_message(message)
    })
}
