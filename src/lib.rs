// src/lib.rs

pub mod cli;
pub mod config;
pub mod diff;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod indicator;
pub mod logging;
pub mod report;
pub mod resolve;
pub mod watch;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::Options;
use crate::engine::{Coordinator, EVENT_CHANNEL_CAPACITY, WatchSet};
use crate::errors::GentrError;
use crate::exec::ShellRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::indicator::{Indicator, SilentIndicator, Spinner};
use crate::report::{ConsoleSink, ResultSink, SessionLog};
use crate::watch::{ModTimes, WatchContext, spawn_detector, spawn_rescanner};

/// What to watch and what to run, decided before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupPlan {
    pub files: Vec<PathBuf>,
    /// Directories walked by the recursive rescan (empty when disabled).
    pub rescan_roots: Vec<PathBuf>,
    pub template: String,
}

/// Decide the initial watch list and command.
///
/// `stdin_paths` wins over `--input` when present.
pub fn plan_startup(
    fs: &dyn FileSystem,
    template: String,
    options: &Options,
    stdin_paths: Option<Vec<PathBuf>>,
) -> errors::Result<StartupPlan> {
    let (files, rescan_roots) = match stdin_paths {
        Some(paths) => (paths, Vec::new()),
        None => (
            resolve::resolve_input(fs, &options.input, options.recursive)?,
            resolve::rescan_roots(fs, &options.input, options.recursive),
        ),
    };

    if files.is_empty() {
        return Err(GentrError::NoFiles);
    }
    if template.trim().is_empty() {
        return Err(GentrError::NoCommand);
    }

    Ok(StartupPlan {
        files,
        rescan_roots,
        template,
    })
}

/// Seed the watch set, failing when nothing could be stat'ed and no rescan
/// could ever add a file.
pub fn seed_watch_set(
    fs: &dyn FileSystem,
    mod_times: &ModTimes,
    plan: &StartupPlan,
) -> errors::Result<WatchSet> {
    let files = WatchSet::seed(fs, mod_times, &plan.files);
    if files.is_empty() && plan.rescan_roots.is_empty() {
        return Err(GentrError::NoFiles);
    }
    Ok(files)
}

/// Paths piped on STDIN, or `None` when STDIN carries no file list.
fn read_stdin_paths() -> Result<Option<Vec<PathBuf>>> {
    let stdin = io::stdin();
    if !stdin_is_piped(&stdin) {
        return Ok(None);
    }
    let paths = resolve::parse_path_list(stdin.lock()).context("reading file list from STDIN")?;
    if paths.is_empty() && cfg!(not(unix)) {
        return Ok(None);
    }
    Ok(Some(paths))
}

/// A pipe, socket or redirected regular file. Character devices such as a
/// terminal or `/dev/null` are not a file list.
#[cfg(unix)]
fn stdin_is_piped(stdin: &io::Stdin) -> bool {
    use std::os::fd::AsFd;
    use std::os::unix::fs::FileTypeExt;

    let metadata = stdin
        .as_fd()
        .try_clone_to_owned()
        .and_then(|fd| std::fs::File::from(fd).metadata());
    match metadata {
        Ok(metadata) => {
            let kind = metadata.file_type();
            kind.is_fifo() || kind.is_socket() || kind.is_file()
        }
        Err(err) => {
            debug!(error = %err, "could not stat STDIN; using --input");
            false
        }
    }
}

#[cfg(not(unix))]
fn stdin_is_piped(stdin: &io::Stdin) -> bool {
    !stdin.is_terminal()
}

/// Resolves on Ctrl-C, or on SIGTERM where there is one.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - input resolution and the startup checks
/// - the session log and console reporting
/// - one detector per file, plus the rescan task in recursive mode
/// - the coordinator, until Ctrl-C or SIGTERM
pub async fn run(args: CliArgs, options: Options) -> Result<()> {
    println!("Starting with options: {}", options.summary());

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let stdin_paths = read_stdin_paths()?;
    let plan = plan_startup(fs.as_ref(), args.command_template(), &options, stdin_paths)?;
    info!(files = plan.files.len(), command = %plan.template, "startup plan ready");

    let mod_times = ModTimes::new();
    let files = seed_watch_set(fs.as_ref(), &mod_times, &plan)?;

    let color = io::stdout().is_terminal();
    let mut sink = ConsoleSink::new(io::stdout(), color, options.length);
    if options.log {
        let session = SessionLog::create(
            &options.log_dir,
            Local::now(),
            &options.summary(),
            &plan.template,
        )?;
        let notice = format!("Created log file: {}", session.path().display());
        sink = sink.with_session_log(session);
        sink.report_notice(&notice);
    }

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let ctx = WatchContext::new(Arc::clone(&fs), mod_times, tx);
    for path in files.paths() {
        spawn_detector(path, ctx.clone());
    }
    if !plan.rescan_roots.is_empty() {
        spawn_rescanner(plan.rescan_roots.clone(), ctx.clone());
    }
    // The channel closes once every detector and the rescanner are gone.
    drop(ctx);

    let indicator: Box<dyn Indicator> = if io::stderr().is_terminal() && !options.debug {
        Box::new(Spinner::spawn("Watching for changes"))
    } else {
        Box::new(SilentIndicator::new())
    };

    let mut coordinator = Coordinator::new(
        fs,
        files,
        rx,
        plan.template,
        ShellRunner::new(),
        sink,
        indicator,
    );

    let nothing_left = tokio::select! {
        _ = coordinator.run() => true,
        () = shutdown_signal() => false,
    };
    coordinator.shutdown();

    if nothing_left {
        println!("No files left to watch.");
    }
    println!("\nShutting down gentr...");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn options(input: &str, recursive: bool) -> Options {
        Options {
            input: input.to_string(),
            recursive,
            ..Options::default()
        }
    }

    #[test]
    fn stdin_list_takes_precedence() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", "a");
        let plan = plan_startup(
            &fs,
            "cat /_".to_string(),
            &options("a.txt", true),
            Some(vec![PathBuf::from("b.txt")]),
        )
        .unwrap();
        assert_eq!(plan.files, vec![PathBuf::from("b.txt")]);
        assert!(plan.rescan_roots.is_empty());
    }

    #[test]
    fn empty_file_list_is_rejected_before_command() {
        let fs = MockFileSystem::new();
        let err = plan_startup(&fs, String::new(), &options(".", false), Some(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, GentrError::NoFiles));
    }

    #[test]
    fn missing_command_is_rejected() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", "a");
        let err = plan_startup(&fs, "  ".to_string(), &options("a.txt", false), None).unwrap_err();
        assert!(matches!(err, GentrError::NoCommand));
    }

    #[test]
    fn unreadable_seed_without_rescan_is_no_files() {
        let fs = MockFileSystem::new();
        let plan = StartupPlan {
            files: vec![PathBuf::from("/definitely/missing.txt")],
            rescan_roots: Vec::new(),
            template: "echo /_".to_string(),
        };
        let err = seed_watch_set(&fs, &ModTimes::new(), &plan).unwrap_err();
        assert!(matches!(err, GentrError::NoFiles));
    }

    #[test]
    fn empty_seed_is_kept_while_a_rescan_can_find_files() {
        let fs = MockFileSystem::new();
        fs.add_file("src/a.rs", "a");
        let plan = StartupPlan {
            files: vec![PathBuf::from("src/gone.rs")],
            rescan_roots: vec![PathBuf::from("src")],
            template: "echo /_".to_string(),
        };
        let files = seed_watch_set(&fs, &ModTimes::new(), &plan).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn recursive_directory_input_gets_a_rescan_root() {
        let fs = MockFileSystem::new();
        fs.add_file("src/a.rs", "a");
        fs.add_file("src/deep/b.rs", "b");
        let plan = plan_startup(&fs, "cargo check".to_string(), &options("src", true), None)
            .unwrap();
        assert_eq!(
            plan.files,
            vec![PathBuf::from("src/a.rs"), PathBuf::from("src/deep/b.rs")]
        );
        assert_eq!(plan.rescan_roots, vec![PathBuf::from("src")]);
    }
}
