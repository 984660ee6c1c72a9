// src/diff/coalesce.rs

use super::{ChangeKind, DiffChange};

/// Merge each Add that is immediately followed by a Remove on the same line
/// number into one Modify (`"<old> -> <new>"`).
///
/// Backtracking with the Remove-first tie-break pushes the Remove to the
/// front first and the Add in front of it, so a substituted line shows up as
/// Add-then-Remove. A Remove-then-Add pair is left alone.
///
/// The result is never longer than the input and the pass is idempotent.
pub fn coalesce_modifications(changes: &[DiffChange]) -> Vec<DiffChange> {
    let mut combined = Vec::with_capacity(changes.len());
    let mut i = 0;

    while i < changes.len() {
        match (&changes[i], changes.get(i + 1)) {
            (add, Some(rem))
                if add.kind == ChangeKind::Add
                    && rem.kind == ChangeKind::Remove
                    && add.line == rem.line =>
            {
                combined.push(DiffChange {
                    line: add.line,
                    kind: ChangeKind::Modify,
                    text: format!("{} -> {}", rem.text, add.text),
                });
                i += 2;
            }
            (change, _) => {
                combined.push(change.clone());
                i += 1;
            }
        }
    }

    combined
}
