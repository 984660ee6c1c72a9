// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The coordinator talks to a `CommandRunner` instead of spawning processes
//! itself, so tests can record invocations without running a shell.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, error, info};

use super::command::{CommandResult, substitute_placeholder};

/// Trait abstracting how the configured command is run for a file.
///
/// Implementations never fail: a shell that cannot be launched is reported
/// as [`super::Outcome::LaunchFailed`] so the watch loop keeps going.
pub trait CommandRunner: Send {
    fn run<'a>(
        &'a mut self,
        template: &'a str,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>>;
}

/// Production runner: `sh -c <command>` (`cmd /C` on Windows).
///
/// No timeout is applied; a command that never exits blocks the caller.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    flag: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        if cfg!(windows) {
            Self::with_shell("cmd", "/C")
        } else {
            Self::with_shell("sh", "-c")
        }
    }
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific shell binary and its "run this string" flag.
    pub fn with_shell(shell: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }

    async fn run_inner(&self, command: String) -> CommandResult {
        info!(cmd = %command, "starting command");

        let mut cmd = Command::new(&self.shell);
        cmd.arg(&self.flag)
            .arg(&command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd
            .spawn()
            .with_context(|| format!("spawning {} for command '{}'", self.shell, command))
        {
            Ok(child) => child,
            Err(err) => {
                error!(cmd = %command, error = ?err, "failed to launch shell");
                return CommandResult::launch_failed(command);
            }
        };

        let output = collect_combined(child.stdout.take(), child.stderr.take()).await;

        match child.wait().await {
            Ok(status) => {
                let result = CommandResult::from_exit(command, &output, status);
                info!(
                    cmd = %result.command,
                    status = result.status,
                    outcome = %result.outcome,
                    "command exited"
                );
                result
            }
            Err(err) => {
                error!(cmd = %command, error = %err, "waiting for command failed");
                CommandResult::launch_failed(command)
            }
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run<'a>(
        &'a mut self,
        template: &'a str,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        let command = substitute_placeholder(template, path);
        Box::pin(self.run_inner(command))
    }
}

/// Read stdout and stderr concurrently into one buffer, in arrival order.
async fn collect_combined<O, E>(mut stdout: Option<O>, mut stderr: Option<E>) -> Vec<u8>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut combined = Vec::new();
    let mut out_buf = [0u8; 4096];
    let mut err_buf = [0u8; 4096];
    let mut out_open = stdout.is_some();
    let mut err_open = stderr.is_some();

    while out_open || err_open {
        tokio::select! {
            res = read_chunk(&mut stdout, &mut out_buf), if out_open => match res {
                Ok(0) => out_open = false,
                Ok(n) => combined.extend_from_slice(&out_buf[..n]),
                Err(err) => {
                    debug!(error = %err, "stdout read failed");
                    out_open = false;
                }
            },
            res = read_chunk(&mut stderr, &mut err_buf), if err_open => match res {
                Ok(0) => err_open = false,
                Ok(n) => combined.extend_from_slice(&err_buf[..n]),
                Err(err) => {
                    debug!(error = %err, "stderr read failed");
                    err_open = false;
                }
            },
        }
    }

    combined
}

async fn read_chunk<R: AsyncRead + Unpin>(
    reader: &mut Option<R>,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    match reader {
        Some(r) => r.read(buf).await,
        None => Ok(0),
    }
}
