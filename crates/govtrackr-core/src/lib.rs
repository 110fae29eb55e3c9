//! GovTrackr Core - structural diff of record snapshots
//!
//! This crate provides the version-comparison kernel behind GovTrackr's
//! record history view:
//! - A tagged-union snapshot model with canonical serialization and digests
//! - The structural diff engine producing a classified `DiffEntry` tree
//! - A `SnapshotDiff` report and a Markdown summary renderer
//! - The structured error and logging facilities shared by all front ends

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod snapshot;

pub use govtrackr_core_types as core_types;

// Re-export commonly used types
pub use config::DiffOptions;
pub use diff::{compute_diff, diff, diff_with_options, DiffEntry, DiffKind, SnapshotDiff};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use snapshot::{parse_snapshot_bytes, Fields, Snapshot, SnapshotValue, ValueKind};
