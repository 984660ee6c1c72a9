// src/diff/lcs.rs

use std::collections::VecDeque;

use super::DiffChange;

/// Diff `old` against `new` line by line.
///
/// Builds the `(m+1) x (n+1)` LCS length table, then backtracks from the
/// bottom-right corner. On a mismatch the upward neighbour wins ties, so a
/// Remove is emitted before an Add is considered. Changes are pushed to the
/// front while backtracking, which leaves the result in ascending order.
pub fn diff_lines<S: AsRef<str>>(old: &[S], new: &[S]) -> Vec<DiffChange> {
    let (m, n) = (old.len(), new.len());
    let eq = |i: usize, j: usize| old[i].as_ref() == new[j].as_ref();

    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if eq(i - 1, j - 1) {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    let mut changes = VecDeque::new();
    let (mut i, mut j) = (m, n);

    while i > 0 && j > 0 {
        if eq(i - 1, j - 1) {
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            changes.push_front(DiffChange::remove(i, old[i - 1].as_ref()));
            i -= 1;
        } else {
            changes.push_front(DiffChange::add(j, new[j - 1].as_ref()));
            j -= 1;
        }
    }
    while i > 0 {
        changes.push_front(DiffChange::remove(i, old[i - 1].as_ref()));
        i -= 1;
    }
    while j > 0 {
        changes.push_front(DiffChange::add(j, new[j - 1].as_ref()));
        j -= 1;
    }

    changes.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;

    #[test]
    fn identical_inputs_produce_no_changes() {
        let lines = ["a", "b", "c"];
        assert!(diff_lines(&lines, &lines).is_empty());
        assert!(diff_lines::<&str>(&[], &[]).is_empty());
    }

    #[test]
    fn single_substitution_is_add_then_remove_at_same_line() {
        let changes = diff_lines(&["a", "b", "c"], &["a", "x", "c"]);
        assert_eq!(
            changes,
            vec![DiffChange::add(2, "x"), DiffChange::remove(2, "b")]
        );
    }

    #[test]
    fn pure_insertions_and_deletions() {
        let added = diff_lines(&["a"], &["a", "b", "c"]);
        assert_eq!(added, vec![DiffChange::add(2, "b"), DiffChange::add(3, "c")]);

        let removed = diff_lines(&["a", "b", "c"], &["c"]);
        assert_eq!(
            removed,
            vec![DiffChange::remove(1, "a"), DiffChange::remove(2, "b")]
        );
    }

    #[test]
    fn empty_old_is_all_adds_and_empty_new_is_all_removes() {
        let adds = diff_lines(&[], &["x", "y"]);
        assert!(adds.iter().all(|c| c.kind == ChangeKind::Add));
        assert_eq!(adds.len(), 2);

        let removes = diff_lines(&["x", "y"], &[]);
        assert!(removes.iter().all(|c| c.kind == ChangeKind::Remove));
        assert_eq!(removes.iter().map(|c| c.line).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn long_lines_are_truncated_in_changes() {
        let long = "z".repeat(80);
        let changes = diff_lines(&[""], &[long.as_str()]);
        let add = changes.iter().find(|c| c.kind == ChangeKind::Add).unwrap();
        assert_eq!(add.text, format!("{}...", "z".repeat(60)));
    }
}
