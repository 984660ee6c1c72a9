// src/exec/command.rs

use std::fmt;
use std::path::Path;
use std::process::ExitStatus;

/// Token replaced with the triggering file's path.
pub const PLACEHOLDER: &str = "/_";

/// Shells report a child killed by signal `N` as exit status `128 + N`.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Highest signal number we decode from a shell exit status.
const MAX_SIGNAL: i32 = 64;

/// Replace every occurrence of [`PLACEHOLDER`] in `template` with `path`.
pub fn substitute_placeholder(template: &str, path: &Path) -> String {
    template.replace(PLACEHOLDER, &path.to_string_lossy())
}

/// How a command run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NonZeroExit,
    Signaled,
    /// The shell itself could not be started.
    LaunchFailed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::NonZeroExit => "nonzero-exit",
            Outcome::Signaled => "signaled",
            Outcome::LaunchFailed => "launch-failed",
        };
        f.write_str(s)
    }
}

/// Result of one triggered execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Combined stdout + stderr, lossily decoded.
    pub output: String,
    /// Exit code; `128 + N` for signal `N`; `-1` when the shell did not start.
    pub status: i32,
    pub outcome: Outcome,
    /// The command after placeholder substitution.
    pub command: String,
}

impl CommandResult {
    pub fn from_exit(command: String, output: &[u8], status: ExitStatus) -> Self {
        let (status, outcome) = classify(status.code(), exit_signal(&status));
        Self {
            output: String::from_utf8_lossy(output).into_owned(),
            status,
            outcome,
            command,
        }
    }

    pub fn launch_failed(command: String) -> Self {
        Self {
            output: String::new(),
            status: -1,
            outcome: Outcome::LaunchFailed,
            command,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Map a wait status to `(status, outcome)`.
///
/// A process killed by a signal has no exit code; it is reported with the
/// shell encoding `128 + signal`. A shell that itself reports `128 + N` for
/// a signaled child is classified the same way, so a command that itself
/// runs `exit 130` is reported as signaled too.
pub fn classify(code: Option<i32>, signal: Option<i32>) -> (i32, Outcome) {
    if let Some(sig) = signal {
        return (SIGNAL_EXIT_BASE + sig, Outcome::Signaled);
    }
    match code {
        Some(0) => (0, Outcome::Success),
        Some(c) if c > SIGNAL_EXIT_BASE && c <= SIGNAL_EXIT_BASE + MAX_SIGNAL => {
            (c, Outcome::Signaled)
        }
        Some(c) => (c, Outcome::NonZeroExit),
        None => (-1, Outcome::NonZeroExit),
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
