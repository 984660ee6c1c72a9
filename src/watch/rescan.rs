// src/watch/rescan.rs

use std::path::PathBuf;

use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::engine::ChangeEvent;
use crate::fs::{FileSystem, split_lines, walk_files};

use super::{ModTimes, WatchContext, spawn_detector};

/// Walk `roots` and start tracking every file that has no baseline yet.
///
/// Returns the newly tracked files with their current content. A file that
/// cannot be read is tracked with an empty snapshot.
pub fn discover_new_files(
    fs: &dyn FileSystem,
    mod_times: &ModTimes,
    roots: &[PathBuf],
) -> Vec<(PathBuf, Vec<String>)> {
    let mut found = Vec::new();

    for root in roots {
        let files = match walk_files(fs, root, None) {
            Ok(files) => files,
            Err(err) => {
                warn!(root = %root.display(), error = ?err, "rescan walk failed");
                continue;
            }
        };

        for path in files {
            if mod_times.contains(&path) {
                continue;
            }
            let Ok(modified) = fs.modified(&path) else {
                continue;
            };
            if !mod_times.insert_if_absent(&path, modified) {
                continue;
            }
            found.push(snapshot(fs, path));
        }
    }

    found
}

fn snapshot(fs: &dyn FileSystem, path: PathBuf) -> (PathBuf, Vec<String>) {
    let lines = match fs.read_to_string(&path) {
        Ok(content) => split_lines(&content),
        Err(err) => {
            warn!(path = %path.display(), error = ?err, "could not read discovered file");
            Vec::new()
        }
    };
    (path, lines)
}

/// Periodically rescan `roots` and hand new files to the coordinator.
///
/// The first scan happens one interval after start. Each discovered file is
/// announced before its detector starts, so the coordinator always holds a
/// snapshot by the time a modification can arrive.
pub fn spawn_rescanner(roots: Vec<PathBuf>, ctx: WatchContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(roots = ?roots, "recursive rescan enabled");

        let mut ticker = time::interval(ctx.rescan_interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let discovered = discover_new_files(ctx.fs.as_ref(), &ctx.mod_times, &roots);
            debug!(count = discovered.len(), "rescan complete");

            for (path, lines) in discovered {
                let event = ChangeEvent::discovered(path.clone(), lines);
                if ctx.events.send(event).await.is_err() {
                    debug!("event channel closed; rescanner exiting");
                    return;
                }
                spawn_detector(path, ctx.clone());
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventKind;
    use crate::fs::mock::MockFileSystem;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn discovers_only_untracked_files() {
        let fs = MockFileSystem::new();
        fs.add_file("src/a.rs", "a");
        fs.add_file("src/nested/b.rs", "b1\nb2");

        let times = ModTimes::new();
        times.insert("src/a.rs", fs.modified(Path::new("src/a.rs")).unwrap());

        let found = discover_new_files(&fs, &times, &[PathBuf::from("src")]);
        assert_eq!(
            found,
            vec![(PathBuf::from("src/nested/b.rs"), vec!["b1".to_string(), "b2".to_string()])]
        );
        assert!(times.contains(Path::new("src/nested/b.rs")));

        let again = discover_new_files(&fs, &times, &[PathBuf::from("src")]);
        assert!(again.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rescanner_announces_then_polls_new_files() {
        let fs = MockFileSystem::new();
        fs.add_file("src/a.rs", "a");

        let (tx, mut rx) = mpsc::channel(1);
        let ctx = WatchContext::new(Arc::new(fs.clone()), ModTimes::new(), tx);
        ctx.mod_times
            .insert("src/a.rs", fs.modified(Path::new("src/a.rs")).unwrap());
        let _handle = spawn_rescanner(vec![PathBuf::from("src")], ctx);

        time::sleep(Duration::from_secs(1)).await;
        fs.add_file("src/new.rs", "fresh");

        let event = rx.recv().await.unwrap();
        assert_eq!(event.path, PathBuf::from("src/new.rs"));
        assert_eq!(
            event.kind,
            EventKind::Discovered {
                lines: vec!["fresh".to_string()]
            }
        );

        // The spawned detector now reports edits to the discovered file.
        time::sleep(Duration::from_millis(1500)).await;
        fs.add_file("src/new.rs", "edited");
        let event = rx.recv().await.unwrap();
        assert_eq!(event, ChangeEvent::modified(PathBuf::from("src/new.rs")));
    }
}
