//! Structural diff engine.
//!
//! Compares two record snapshots field by field and produces an ordered,
//! classified tree of [`DiffEntry`] values, suitable for a side-by-side
//! version-history view or for JSON transport.
//!
//! ## Entry point
//!
//! ```
//! use govtrackr_core::diff::{diff, DiffKind};
//! use govtrackr_core::snapshot::Snapshot;
//!
//! let left = Snapshot::new().with("name", "A");
//! let right = Snapshot::new().with("name", "B");
//! let entries = diff(&left, &right).unwrap();
//! assert_eq!(entries[0].kind, DiffKind::Modified);
//! ```
//!
//! ## Guarantees
//!
//! - **Totality**: every key present on either side is reported exactly
//!   once at its path, down to a type-kind mismatch or the depth bound.
//! - **Determinism**: identical inputs produce identical trees.
//! - **Purity**: inputs are never mutated and no state is kept between calls.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, diff, diff_with_options};
pub use human_summary::render_human_summary;
pub use model::{
    walk_entries, DiffClassification, DiffEntry, DiffIssue, DiffKind, DiffStats, PathSegment,
    RenderedValue, SnapshotDiff, NOT_PRESENT,
};
