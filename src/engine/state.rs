// src/engine/state.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::fs::{FileSystem, split_lines};
use crate::watch::ModTimes;

/// Last known state of one watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    /// Content split on `\n`.
    pub lines: Vec<String>,
}

/// Content snapshots owned by the coordinator.
#[derive(Debug, Default)]
pub struct WatchSet {
    files: HashMap<PathBuf, WatchedFile>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial set and record modification-time baselines.
    ///
    /// Paths that cannot be stat'ed are skipped. Paths that cannot be read
    /// are kept with an empty snapshot.
    pub fn seed(fs: &dyn FileSystem, mod_times: &ModTimes, paths: &[PathBuf]) -> Self {
        let mut set = Self::new();

        for path in paths {
            let modified = match fs.modified(path) {
                Ok(t) => t,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "error stating file; not watching it"
                    );
                    continue;
                }
            };
            mod_times.insert(path.clone(), modified);

            let lines = match fs.read_to_string(path) {
                Ok(content) => split_lines(&content),
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = ?err,
                        "could not read file; starting from an empty snapshot"
                    );
                    Vec::new()
                }
            };

            set.insert(WatchedFile {
                path: path.clone(),
                modified: Some(modified),
                lines,
            });
        }

        debug!(count = set.len(), "seeded watch set");
        set
    }

    pub fn insert(&mut self, file: WatchedFile) {
        self.files.insert(file.path.clone(), file);
    }

    /// Replace the snapshot for `path`, creating the entry if needed.
    pub fn update(&mut self, path: &Path, lines: Vec<String>, modified: Option<SystemTime>) {
        let entry = self
            .files
            .entry(path.to_path_buf())
            .or_insert_with(|| WatchedFile {
                path: path.to_path_buf(),
                modified: None,
                lines: Vec::new(),
            });
        entry.lines = lines;
        if modified.is_some() {
            entry.modified = modified;
        }
    }

    pub fn get(&self, path: &Path) -> Option<&WatchedFile> {
        self.files.get(path)
    }

    /// Stored lines, or an empty slice for an unknown path.
    pub fn lines(&self, path: &Path) -> &[String] {
        self.files
            .get(path)
            .map(|f| f.lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn remove(&mut self, path: &Path) -> Option<WatchedFile> {
        self.files.remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Tracked paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
