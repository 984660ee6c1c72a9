// src/diff/mod.rs

//! Line diff between two snapshots of a watched file.
//!
//! - [`lcs`] computes Add/Remove changes from a longest-common-subsequence
//!   table, with a fixed Remove-first tie-break so output is reproducible.
//! - [`coalesce`] folds an Add immediately followed by a Remove on the same
//!   line into a single Modify.

use std::fmt;

pub mod coalesce;
pub mod lcs;

pub use coalesce::coalesce_modifications;
pub use lcs::diff_lines;

/// Maximum number of characters kept from a line in reports.
pub const MAX_LINE_CHARS: usize = 60;

/// Kind of a single line change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Remove,
    Modify,
}

impl ChangeKind {
    /// Short tag used in console and session log output.
    pub fn tag(self) -> &'static str {
        match self {
            ChangeKind::Add => "ADD",
            ChangeKind::Remove => "REM",
            ChangeKind::Modify => "MOD",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One reported line change.
///
/// `line` is 1-based. It refers to the old content for `Remove`, the new
/// content for `Add`, and the edit position for `Modify`. `text` is already
/// truncated; a `Modify` carries `"<old> -> <new>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffChange {
    pub line: usize,
    pub kind: ChangeKind,
    pub text: String,
}

impl DiffChange {
    pub fn add(line: usize, text: &str) -> Self {
        Self {
            line,
            kind: ChangeKind::Add,
            text: truncate_line(text, MAX_LINE_CHARS),
        }
    }

    pub fn remove(line: usize, text: &str) -> Self {
        Self {
            line,
            kind: ChangeKind::Remove,
            text: truncate_line(text, MAX_LINE_CHARS),
        }
    }
}

/// Truncate `line` to `max_chars` characters, appending `...` if anything
/// was cut. Counts `char`s so multi-byte text is never split.
pub fn truncate_line(line: &str, max_chars: usize) -> String {
    match line.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &line[..byte_idx]),
        None => line.to_string(),
    }
}
