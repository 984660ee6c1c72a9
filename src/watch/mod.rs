// src/watch/mod.rs

//! Poll-based change detection.
//!
//! Every tracked path gets its own [`detector`] task that stats the file on
//! a fixed interval. In recursive mode a [`rescan`] task walks the root
//! directories and hands newly discovered files to the coordinator.
//!
//! Both kinds of task share the modification-time baselines through
//! [`ModTimes`]. File contents are never touched here; they belong to the
//! coordinator.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;

use crate::engine::{ChangeEvent, POLL_INTERVAL, RESCAN_INTERVAL};
use crate::fs::FileSystem;

pub mod detector;
pub mod rescan;

pub use detector::{PollOutcome, check_path, spawn_detector};
pub use rescan::{discover_new_files, spawn_rescanner};

/// Shared map of last-seen modification times, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct ModTimes {
    inner: Arc<Mutex<HashMap<PathBuf, SystemTime>>>,
}

impl ModTimes {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, SystemTime>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, path: &Path) -> Option<SystemTime> {
        self.lock().get(path).copied()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, modified: SystemTime) {
        self.lock().insert(path.into(), modified);
    }

    /// Insert only when `path` is not tracked yet. Returns whether it was
    /// inserted.
    pub fn insert_if_absent(&self, path: &Path, modified: SystemTime) -> bool {
        let mut map = self.lock();
        if map.contains_key(path) {
            return false;
        }
        map.insert(path.to_path_buf(), modified);
        true
    }

    pub fn remove(&self, path: &Path) -> Option<SystemTime> {
        self.lock().remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Move the baseline forward when `current` is newer.
    ///
    /// Returns `true` only when the baseline advanced. An untracked path is
    /// recorded and reported as unchanged.
    pub fn advance(&self, path: &Path, current: SystemTime) -> bool {
        let mut map = self.lock();
        match map.get_mut(path) {
            Some(baseline) if current > *baseline => {
                *baseline = current;
                true
            }
            Some(_) => false,
            None => {
                map.insert(path.to_path_buf(), current);
                false
            }
        }
    }
}

/// Everything a detector or rescan task needs.
#[derive(Debug, Clone)]
pub struct WatchContext {
    pub fs: Arc<dyn FileSystem>,
    pub mod_times: ModTimes,
    pub events: mpsc::Sender<ChangeEvent>,
    pub poll_interval: Duration,
    pub rescan_interval: Duration,
}

impl WatchContext {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        mod_times: ModTimes,
        events: mpsc::Sender<ChangeEvent>,
    ) -> Self {
        Self {
            fs,
            mod_times,
            events,
            poll_interval: POLL_INTERVAL,
            rescan_interval: RESCAN_INTERVAL,
        }
    }
}
