// src/engine/mod.rs

pub mod coordinator;
pub mod state;

use std::path::PathBuf;
use std::time::Duration;

pub use coordinator::{Coordinator, Cycle};
pub use state::{WatchSet, WatchedFile};

/// Quiet period between the first modification event and the command run.
///
/// The window is fixed: events arriving during it do not extend it.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// How often each detector stats its file.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How often recursive mode walks the root directories for new files.
pub const RESCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Capacity of the detector -> coordinator channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1;

/// Something happened to a watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Modification time moved forward.
    Modified,
    /// The path no longer exists.
    Deleted,
    /// Found by a recursive rescan, with its content at discovery time.
    Discovered { lines: Vec<String> },
}

impl ChangeEvent {
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EventKind::Modified,
        }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EventKind::Deleted,
        }
    }

    pub fn discovered(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            kind: EventKind::Discovered { lines },
        }
    }
}
