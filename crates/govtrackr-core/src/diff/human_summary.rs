//! Human-readable summary renderer for structural diffs.

use crate::diff::model::{
    walk_entries, DiffClassification, DiffEntry, DiffIssue, DiffKind, SnapshotDiff,
};

/// Render a Markdown summary of a [`SnapshotDiff`].
///
/// Lists every changed leaf path with its before/after text. Informational
/// only; the structured diff is the source of truth.
pub fn render_human_summary(diff: &SnapshotDiff) -> String {
    let mut out = String::new();

    out.push_str("## Snapshot Diff\n\n");

    let class_label = match diff.classification {
        DiffClassification::Identical => "Identical",
        DiffClassification::Changed => "Changed",
    };
    out.push_str(&format!("**Classification**: {class_label}\n\n"));

    out.push_str("### Identity\n\n");
    out.push_str(&format!(
        "| | Canonical Digest |\n\
         |---|---|\n\
         | Left | `{}` |\n\
         | Right | `{}` |\n\n",
        short(&diff.identity.left_digest),
        short(&diff.identity.right_digest),
    ));

    if diff.classification == DiffClassification::Identical {
        out.push_str(&format!(
            "_No changes detected across {} field(s)._\n",
            diff.stats.unchanged
        ));
        return out;
    }

    let s = &diff.stats;
    out.push_str("### Stats\n\n");
    out.push_str(&format!(
        "- Added: {}\n- Removed: {}\n- Modified: {}\n- Unchanged: {}\n",
        s.added, s.removed, s.modified, s.unchanged
    ));
    if s.issues > 0 {
        out.push_str(&format!("- Not compared structurally: {}\n", s.issues));
    }
    out.push('\n');

    out.push_str("### Changes\n\n");
    for entry in walk_entries(&diff.entries).filter(|e| e.is_leaf() && e.is_changed()) {
        out.push_str(&change_line(entry));
    }

    out
}

fn change_line(entry: &DiffEntry) -> String {
    let marker = match (&entry.issue, entry.kind) {
        (Some(_), _) => '!',
        (None, DiffKind::Added) => '+',
        (None, DiffKind::Removed) => '-',
        (None, _) => '~',
    };
    let note = match &entry.issue {
        Some(DiffIssue::TypeKindMismatch { left, right }) => {
            format!(" (type kind mismatch: {} vs {})", left, right)
        }
        Some(DiffIssue::MaxDepthExceeded { limit }) => {
            format!(" (nested beyond depth {})", limit)
        }
        None => String::new(),
    };
    format!(
        "- `{} {}`{}: {} → {}\n",
        marker, entry.path, note, entry.left_value, entry.right_value
    )
}

/// First 12 characters of a digest
fn short(digest: &str) -> &str {
    let end = digest
        .char_indices()
        .nth(12)
        .map(|(i, _)| i)
        .unwrap_or(digest.len());
    &digest[..end]
}
