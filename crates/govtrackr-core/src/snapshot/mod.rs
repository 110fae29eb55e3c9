//! Snapshot model: values, canonical form, display text and parsing.

pub mod canonical;
pub mod display;
pub mod parse;
pub mod value;

pub use canonical::{canonical_digest, canonical_string, same_value};
pub use parse::parse_snapshot_bytes;
pub use value::{Fields, Snapshot, SnapshotValue, ValueKind};
