// src/engine/coordinator.rs

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use crate::diff::{DiffChange, coalesce_modifications, diff_lines};
use crate::exec::{CommandResult, CommandRunner};
use crate::fs::{FileSystem, split_lines};
use crate::indicator::Indicator;
use crate::report::ResultSink;

use super::state::{WatchSet, WatchedFile};
use super::{ChangeEvent, DEBOUNCE_WINDOW, EventKind};

/// What handling one event amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// The command ran against `path`.
    Executed {
        path: PathBuf,
        changes: Vec<DiffChange>,
        result: CommandResult,
    },
    /// The file could not be read after the debounce window; nothing ran.
    ReadFailed(PathBuf),
    Deleted(PathBuf),
    Discovered(PathBuf),
}

/// Single consumer of [`ChangeEvent`]s.
///
/// Owns the content snapshots and is the only place where commands are
/// run, so at most one command is in flight at any time.
pub struct Coordinator<R: CommandRunner, S: ResultSink, I: Indicator> {
    fs: Arc<dyn FileSystem>,
    files: WatchSet,
    events: mpsc::Receiver<ChangeEvent>,
    /// Events pulled off the channel while absorbing duplicates.
    pending: VecDeque<ChangeEvent>,
    template: String,
    runner: R,
    sink: S,
    indicator: I,
    debounce: Duration,
}

impl<R: CommandRunner, S: ResultSink, I: Indicator> fmt::Debug for Coordinator<R, S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("files", &self.files)
            .field("pending", &self.pending)
            .field("template", &self.template)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner, S: ResultSink, I: Indicator> Coordinator<R, S, I> {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        files: WatchSet,
        events: mpsc::Receiver<ChangeEvent>,
        template: impl Into<String>,
        runner: R,
        sink: S,
        indicator: I,
    ) -> Self {
        Self {
            fs,
            files,
            events,
            pending: VecDeque::new(),
            template: template.into(),
            runner,
            sink,
            indicator,
            debounce: DEBOUNCE_WINDOW,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn files(&self) -> &WatchSet {
        &self.files
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Main loop. Returns once every sender is gone.
    ///
    /// Dropping the returned future (e.g. on Ctrl-C) abandons the current
    /// cycle; call [`Coordinator::shutdown`] afterwards.
    pub async fn run(&mut self) {
        info!(files = self.files.len(), command = %self.template, "coordinator started");
        self.indicator.start();

        while let Some(event) = self.next_event().await {
            let cycle = self.handle_event(event).await;
            debug!(?cycle, "cycle finished");
        }

        info!("event channel closed; coordinator exiting");
        self.indicator.stop();
    }

    pub fn shutdown(&mut self) {
        self.indicator.stop();
    }

    async fn next_event(&mut self) -> Option<ChangeEvent> {
        match self.pending.pop_front() {
            Some(event) => Some(event),
            None => self.events.recv().await,
        }
    }

    /// Handle one event to completion.
    pub async fn handle_event(&mut self, event: ChangeEvent) -> Cycle {
        let ChangeEvent { path, kind } = event;
        match kind {
            EventKind::Deleted => {
                info!(path = %path.display(), "file deleted");
                self.sink.report_deletion(&path);
                self.files.remove(&path);
                Cycle::Deleted(path)
            }
            EventKind::Discovered { lines } => {
                let modified = self.fs.modified(&path).ok();
                self.files.insert(WatchedFile {
                    path: path.clone(),
                    modified,
                    lines,
                });
                self.sink
                    .report_notice(&format!("New file detected and added: {}", path.display()));
                Cycle::Discovered(path)
            }
            EventKind::Modified => self.process_modification(path).await,
        }
    }

    async fn process_modification(&mut self, path: PathBuf) -> Cycle {
        self.indicator.pause();
        time::sleep(self.debounce).await;

        let absorbed = self.absorb_duplicates(&path);
        if absorbed > 0 {
            debug!(path = %path.display(), absorbed, "coalesced queued modifications");
        }

        self.sink.report_notice(&format!(
            "Change detected in file: {}. Executing command...",
            path.display()
        ));

        let content = match self.fs.read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = ?err, "failed to read changed file");
                self.sink
                    .report_error(&format!("Error reading file {}: {err:#}", path.display()));
                self.indicator.resume();
                return Cycle::ReadFailed(path);
            }
        };

        let fresh = split_lines(&content);
        let stored = self.files.lines(&path);
        let changes = coalesce_modifications(&diff_lines(stored, fresh.as_slice()));

        let result = self.runner.run(&self.template, &path).await;
        self.sink.report_result(&path, &result);
        for change in &changes {
            self.sink.report_change(&path, change, &result);
        }

        let modified = self.fs.modified(&path).ok();
        self.files.update(&path, fresh, modified);
        self.indicator.resume();

        Cycle::Executed {
            path,
            changes,
            result,
        }
    }

    /// Drop queued `Modified` events for `path`; this cycle covers them.
    /// Other events are kept, in order, for later.
    fn absorb_duplicates(&mut self, path: &Path) -> usize {
        let mut absorbed = 0;
        self.pending.retain(|event| {
            let duplicate = is_modification_of(event, path);
            if duplicate {
                absorbed += 1;
            }
            !duplicate
        });

        while let Ok(event) = self.events.try_recv() {
            if is_modification_of(&event, path) {
                absorbed += 1;
            } else {
                self.pending.push_back(event);
            }
        }
        absorbed
    }
}

fn is_modification_of(event: &ChangeEvent, path: &Path) -> bool {
    event.kind == EventKind::Modified && event.path == path
}
