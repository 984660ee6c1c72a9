// src/watch/detector.rs

use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::engine::ChangeEvent;
use crate::fs::FileSystem;

use super::{ModTimes, WatchContext};

/// Result of one stat of a tracked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Unchanged,
    Modified,
    /// The path is gone; its baseline has been dropped.
    Deleted,
    /// Stat failed for another reason; try again next tick.
    StatFailed,
}

/// Stat `path` once and update its baseline.
pub fn check_path(fs: &dyn FileSystem, mod_times: &ModTimes, path: &Path) -> PollOutcome {
    match fs.modified(path) {
        Ok(current) => {
            if mod_times.advance(path, current) {
                PollOutcome::Modified
            } else {
                PollOutcome::Unchanged
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            mod_times.remove(path);
            PollOutcome::Deleted
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "error stating file");
            PollOutcome::StatFailed
        }
    }
}

/// Spawn the polling task for one path.
pub fn spawn_detector(path: PathBuf, ctx: WatchContext) -> JoinHandle<()> {
    tokio::spawn(poll_path(path, ctx))
}

/// Poll `path` until it is deleted or the event channel closes.
pub async fn poll_path(path: PathBuf, ctx: WatchContext) {
    debug!(path = %path.display(), "detector started");

    let mut ticker = time::interval(ctx.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match check_path(ctx.fs.as_ref(), &ctx.mod_times, &path) {
            PollOutcome::Unchanged | PollOutcome::StatFailed => {}
            PollOutcome::Modified => {
                match ctx.events.try_send(ChangeEvent::modified(path.clone())) {
                    Ok(()) => debug!(path = %path.display(), "modification queued"),
                    Err(TrySendError::Full(_)) => {
                        debug!(path = %path.display(), "event channel full; dropping modification")
                    }
                    Err(TrySendError::Closed(_)) => break,
                }
            }
            PollOutcome::Deleted => {
                info!(path = %path.display(), "file deleted; stopping detector");
                if ctx.events.send(ChangeEvent::deleted(path.clone())).await.is_err() {
                    debug!(path = %path.display(), "event channel closed before deletion was sent");
                }
                return;
            }
        }

        if ctx.events.is_closed() {
            break;
        }
    }

    debug!(path = %path.display(), "event channel closed; detector exiting");
}
