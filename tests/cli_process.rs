// tests/cli_process.rs

#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::Duration;

type TestResult = Result<(), Box<dyn Error>>;

/// Time given to the binary to get past startup and install its handlers.
const SETTLE: Duration = Duration::from_millis(1500);

fn gentr_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gentr"));
    cmd.current_dir(workdir)
        .env_remove("GENTR_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn terminate(child: &Child) -> TestResult {
    let status = Command::new("kill")
        .arg("-TERM")
        .arg(child.id().to_string())
        .status()?;
    assert!(status.success(), "kill -TERM failed: {status}");
    Ok(())
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn stop(mut child: Child) -> std::io::Result<Output> {
    let _ = child.kill();
    child.wait_with_output()
}

#[test]
fn null_stdin_falls_back_to_input_flag() -> TestResult {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("a.txt");
    fs::write(&file, "a")?;

    let mut child = gentr_cmd(dir.path())
        .arg("-i")
        .arg(&file)
        .args(["echo", "/_"])
        .stdin(Stdio::null())
        .spawn()?;

    thread::sleep(SETTLE);
    let still_running = child.try_wait()?.is_none();
    let output = stop(child)?;
    assert!(
        still_running,
        "gentr exited early; stderr: {}",
        text(&output.stderr)
    );
    Ok(())
}

#[test]
fn unreadable_piped_paths_fail_startup() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut child = gentr_cmd(dir.path())
        .args(["echo", "/_"])
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(b"/definitely/missing.txt\n")?;
    }

    let output = child.wait_with_output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(text(&output.stderr).contains("No files provided via STDIN or --input flag"));
    assert!(!text(&output.stdout).contains("No files left to watch."));
    Ok(())
}

#[test]
fn sigterm_shuts_down_cleanly_and_log_creation_is_announced() -> TestResult {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("a.txt");
    fs::write(&file, "a")?;

    let child = gentr_cmd(dir.path())
        .args(["--log", "-i"])
        .arg(&file)
        .args(["echo", "/_"])
        .stdin(Stdio::null())
        .spawn()?;

    thread::sleep(SETTLE);
    terminate(&child)?;
    let output = child.wait_with_output()?;
    let stdout = text(&output.stdout);

    assert!(
        output.status.success(),
        "status {:?}; stderr: {}",
        output.status,
        text(&output.stderr)
    );
    assert!(stdout.contains("Created log file: "), "stdout: {stdout}");
    assert!(stdout.contains("Shutting down gentr..."), "stdout: {stdout}");

    let logs: Vec<_> = fs::read_dir(dir.path())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "log"))
        .collect();
    assert_eq!(logs.len(), 1);
    Ok(())
}
