// src/report/format.rs

//! Pure formatting helpers for console and session log output.

use std::path::Path;
use std::sync::LazyLock;

use crossterm::style::{Color, Stylize};
use regex::Regex;

use crate::diff::{ChangeKind, DiffChange, MAX_LINE_CHARS, truncate_line};
use crate::exec::{CommandResult, Outcome};

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*m").expect("ANSI pattern is valid")
});

/// Remove SGR escape sequences (colors, bold, ...).
pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Split command output into display lines.
///
/// With `length > 0` and more lines than that, only the last `length - 1`
/// lines are kept, preceded by a `...` marker. Every line is truncated.
pub fn limit_output(raw: &str, length: usize) -> Vec<String> {
    let lines: Vec<&str> = raw.split('\n').collect();

    let kept: Vec<&str> = if length > 0 && lines.len() > length {
        let tail = &lines[lines.len() - (length - 1)..];
        std::iter::once("...").chain(tail.iter().copied()).collect()
    } else {
        lines
    };

    kept.into_iter()
        .map(|l| truncate_line(l, MAX_LINE_CHARS))
        .collect()
}

/// `exit|N|cmd`, `signal|N|cmd` or `launch-failed|-1|cmd`.
pub fn status_line(result: &CommandResult, color: bool) -> String {
    let kind = match result.outcome {
        Outcome::Success | Outcome::NonZeroExit => "exit",
        Outcome::Signaled => "signal",
        Outcome::LaunchFailed => "launch-failed",
    };

    let head = format!("{kind}|{}", result.status);
    let tail = format!("|{}", result.command);
    if !color {
        return format!("{head}{tail}");
    }

    let accent = match result.outcome {
        Outcome::Success => Color::Green,
        Outcome::NonZeroExit => Color::Red,
        Outcome::Signaled => Color::Yellow,
        Outcome::LaunchFailed => Color::Magenta,
    };
    format!("{}{}", head.white().on(accent).bold(), tail.with(accent))
}

/// `<path>:<line> <TAG>: <text>`
pub fn format_change(path: &Path, change: &DiffChange, color: bool) -> String {
    let path = path.display().to_string();
    let tag = change.kind.tag();

    if !color {
        return format!("{path}:{} {tag}: {}", change.line, change.text);
    }

    let tag = match change.kind {
        ChangeKind::Add => tag.white().on_green().bold(),
        ChangeKind::Remove => tag.white().on_red().bold(),
        ChangeKind::Modify => tag.grey().on_yellow().bold(),
    };
    let text = match change.kind {
        ChangeKind::Add => change.text.as_str().green().bold(),
        ChangeKind::Remove => change.text.as_str().red().bold(),
        ChangeKind::Modify => change.text.as_str().bold(),
    };
    format!("{}:{} {tag}: {text}", path.cyan().bold(), change.line)
}

/// Bold blue section header.
pub fn header(title: &str, color: bool) -> String {
    if color {
        title.blue().bold().to_string()
    } else {
        title.to_string()
    }
}
