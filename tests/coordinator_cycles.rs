// tests/coordinator_cycles.rs

mod common;
use crate::common::{FakeRunner, SinkRecord, harness, init_tracing, with_timeout};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};

use gentr::diff::{ChangeKind, DiffChange};
use gentr::engine::{ChangeEvent, DEBOUNCE_WINDOW};
use gentr::fs::mock::MockFileSystem;
use gentr::indicator::IndicatorMessage as M;
use gentr::watch::{WatchContext, spawn_detector};

fn notice_for(path: &str) -> SinkRecord {
    SinkRecord::Notice(format!("Change detected in file: {path}. Executing command..."))
}

#[tokio::test(start_paused = true)]
async fn burst_of_events_runs_once_with_content_read_after_window() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.txt", "one");
    let mut h = harness(&fs, &["a.txt"], FakeRunner::new());

    let start = Instant::now();
    h.events.send(ChangeEvent::modified("a.txt")).await.unwrap();
    h.events.send(ChangeEvent::modified("a.txt")).await.unwrap();

    // Lands inside the debounce window; the cycle must still see it.
    let writer = {
        let fs = fs.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(200)).await;
            fs.add_file("a.txt", "one\ntwo");
        })
    };
    drop(h.events);

    with_timeout(h.coordinator.run()).await;
    writer.await.unwrap();

    let runs = h.runner.runs();
    assert_eq!(runs.len(), 1, "duplicates collapse into one run");
    assert_eq!(runs[0].command, "echo a.txt");
    assert!(runs[0].at - start >= DEBOUNCE_WINDOW);

    let records = h.sink.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], notice_for("a.txt"));
    assert!(matches!(&records[1], SinkRecord::Result { result, .. } if result.output == "ok\n"));
    assert_eq!(
        records[2],
        SinkRecord::Change {
            path: PathBuf::from("a.txt"),
            change: DiffChange::add(2, "two"),
            status: 0,
        }
    );

    assert_eq!(h.indicator.calls(), vec![M::Start, M::Pause, M::Resume, M::Stop]);
}

#[tokio::test(start_paused = true)]
async fn deletion_produces_one_record_and_no_run() {
    let fs = MockFileSystem::new();
    fs.add_file("a.txt", "one");
    let mut h = harness(&fs, &["a.txt"], FakeRunner::new());

    h.events.send(ChangeEvent::deleted("a.txt")).await.unwrap();
    drop(h.events);
    with_timeout(h.coordinator.run()).await;

    assert_eq!(h.sink.records(), vec![SinkRecord::Deletion(PathBuf::from("a.txt"))]);
    assert!(h.runner.runs().is_empty());
    assert_eq!(h.indicator.calls(), vec![M::Start, M::Stop]);
    assert!(h.coordinator.files().is_empty());
}

#[tokio::test(start_paused = true)]
async fn read_failure_reports_error_and_resumes() {
    let fs = MockFileSystem::new();
    fs.add_file("a.txt", "one");
    let mut h = harness(&fs, &["a.txt"], FakeRunner::new());

    fs.remove("a.txt");
    h.events.send(ChangeEvent::modified("a.txt")).await.unwrap();
    drop(h.events);
    with_timeout(h.coordinator.run()).await;

    let records = h.sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], notice_for("a.txt"));
    assert!(matches!(
        &records[1],
        SinkRecord::Error(msg) if msg.starts_with("Error reading file a.txt")
    ));
    assert!(h.runner.runs().is_empty());
    assert_eq!(h.indicator.calls(), vec![M::Start, M::Pause, M::Resume, M::Stop]);
}

#[tokio::test(start_paused = true)]
async fn changes_carry_the_status_of_their_run() {
    let fs = MockFileSystem::new();
    fs.add_file("a.txt", "a\nb\nc");
    let mut h = harness(&fs, &["a.txt"], FakeRunner::new().with_status(2));

    fs.add_file("a.txt", "a\nx\nc");
    h.events.send(ChangeEvent::modified("a.txt")).await.unwrap();
    drop(h.events);
    with_timeout(h.coordinator.run()).await;

    let records = h.sink.records();
    assert!(matches!(&records[1], SinkRecord::Result { result, .. } if result.status == 2));
    match &records[2] {
        SinkRecord::Change { change, status, .. } => {
            assert_eq!(change.kind, ChangeKind::Modify);
            assert_eq!(change.line, 2);
            assert_eq!(change.text, "b -> x");
            assert_eq!(*status, 2);
        }
        other => panic!("unexpected record: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn events_for_other_paths_wait_their_turn() {
    let fs = MockFileSystem::new();
    fs.add_file("a.txt", "a");
    fs.add_file("b.txt", "b");
    let mut h = harness(&fs, &["a.txt", "b.txt"], FakeRunner::new());

    h.events.send(ChangeEvent::modified("a.txt")).await.unwrap();
    h.events.send(ChangeEvent::modified("b.txt")).await.unwrap();
    h.events.send(ChangeEvent::modified("a.txt")).await.unwrap();
    drop(h.events);
    with_timeout(h.coordinator.run()).await;

    let paths: Vec<PathBuf> = h.runner.runs().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
}

#[tokio::test(start_paused = true)]
async fn detector_to_coordinator_pipeline() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("watched.txt", "v1");
    let h = harness(&fs, &["watched.txt"], FakeRunner::new());
    let mut coordinator = h.coordinator;

    let ctx = WatchContext::new(Arc::new(fs.clone()), h.mod_times.clone(), h.events.clone());
    let detector = spawn_detector(PathBuf::from("watched.txt"), ctx);
    drop(h.events);

    let editor = {
        let fs = fs.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(1500)).await;
            fs.add_file("watched.txt", "v2");
            // After the cycle has read v2, before the next poll.
            time::sleep(Duration::from_millis(1200)).await;
            fs.remove("watched.txt");
        })
    };

    // Ends once the detector has reported the deletion and exited.
    with_timeout(coordinator.run()).await;
    editor.await.unwrap();
    detector.await.unwrap();

    assert_eq!(h.runner.runs().len(), 1);
    let records = h.sink.records();
    assert_eq!(
        records.last(),
        Some(&SinkRecord::Deletion(PathBuf::from("watched.txt")))
    );
    assert!(records.contains(&SinkRecord::Change {
        path: PathBuf::from("watched.txt"),
        change: DiffChange {
            line: 1,
            kind: ChangeKind::Modify,
            text: "v1 -> v2".to_string(),
        },
        status: 0,
    }));
}
