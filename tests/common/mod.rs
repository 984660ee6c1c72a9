#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use gentr::engine::{ChangeEvent, Coordinator, WatchSet};
use gentr::fs::mock::MockFileSystem;
use gentr::watch::ModTimes;

pub use gentr_test_utils::fakes::{
    FakeRunner, RecordingIndicator, RecordingSink, RunRecord, SinkRecord,
};
pub use gentr_test_utils::{init_tracing, with_timeout};

pub type FakeCoordinator = Coordinator<FakeRunner, RecordingSink, RecordingIndicator>;

/// Handles kept by the test after the fakes move into the coordinator.
pub struct Harness {
    pub coordinator: FakeCoordinator,
    pub events: mpsc::Sender<ChangeEvent>,
    pub mod_times: ModTimes,
    pub runner: FakeRunner,
    pub sink: RecordingSink,
    pub indicator: RecordingIndicator,
}

/// Coordinator over `fs` watching `paths`, running `echo /_`.
pub fn harness(fs: &MockFileSystem, paths: &[&str], runner: FakeRunner) -> Harness {
    let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    let mod_times = ModTimes::new();
    let files = WatchSet::seed(fs, &mod_times, &paths);
    let (tx, rx) = mpsc::channel(8);

    let sink = RecordingSink::new();
    let indicator = RecordingIndicator::new();
    let coordinator = Coordinator::new(
        Arc::new(fs.clone()),
        files,
        rx,
        "echo /_",
        runner.clone(),
        sink.clone(),
        indicator.clone(),
    );

    Harness {
        coordinator,
        events: tx,
        mod_times,
        runner,
        sink,
        indicator,
    }
}
