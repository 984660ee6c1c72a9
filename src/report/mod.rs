// src/report/mod.rs

//! Result reporting: console rendering plus the optional session log.
//!
//! The coordinator only sees the [`ResultSink`] trait. [`ConsoleSink`] is
//! the production implementation; it writes to any `io::Write` so tests can
//! capture the rendered text in a `Vec<u8>`.

use std::io::Write;
use std::path::Path;

use crossterm::style::Stylize;
use tracing::warn;

use crate::diff::DiffChange;
use crate::exec::CommandResult;

pub mod format;
pub mod session_log;

pub use format::{format_change, header, limit_output, status_line, strip_ansi};
pub use session_log::{SessionLog, session_file_name};

/// Destination for everything the watch loop has to tell the user.
///
/// Reporting never fails from the caller's point of view: implementations
/// log their own write errors.
pub trait ResultSink: Send {
    /// Command output block followed by the status line.
    fn report_result(&mut self, path: &Path, result: &CommandResult);

    /// One diff entry, recorded with the status of the run it belongs to.
    fn report_change(&mut self, path: &Path, change: &DiffChange, result: &CommandResult);

    fn report_deletion(&mut self, path: &Path);

    /// Informational line (change detected, file discovered, ...).
    fn report_notice(&mut self, message: &str);

    fn report_error(&mut self, message: &str);
}

impl<T: ResultSink + ?Sized> ResultSink for Box<T> {
    fn report_result(&mut self, path: &Path, result: &CommandResult) {
        (**self).report_result(path, result)
    }

    fn report_change(&mut self, path: &Path, change: &DiffChange, result: &CommandResult) {
        (**self).report_change(path, change, result)
    }

    fn report_deletion(&mut self, path: &Path) {
        (**self).report_deletion(path)
    }

    fn report_notice(&mut self, message: &str) {
        (**self).report_notice(message)
    }

    fn report_error(&mut self, message: &str) {
        (**self).report_error(message)
    }
}

/// Console renderer with an optional [`SessionLog`] behind it.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    color: bool,
    /// Output line limit; `0` means unlimited.
    length: usize,
    session: Option<SessionLog>,
}

impl<W: Write + Send> std::fmt::Debug for ConsoleSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("color", &self.color)
            .field("length", &self.length)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, color: bool, length: usize) -> Self {
        Self {
            out,
            color,
            length,
            session: None,
        }
    }

    pub fn with_session_log(mut self, session: SessionLog) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session_log(&self) -> Option<&SessionLog> {
        self.session.as_ref()
    }

    /// Give back the writer, mostly for inspecting captured output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(error = %err, "failed to write report line");
        }
    }

    fn flush(&mut self) {
        if let Err(err) = self.out.flush() {
            warn!(error = %err, "failed to flush report output");
        }
    }

    fn log_row(&mut self, description: &str, status: i32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.append(description, status) {
            warn!(error = ?err, path = ?session.path(), "session log write failed");
            let notice = format!("Failed to write session log: {err:#}");
            self.report_error(&notice);
        }
    }
}

impl<W: Write + Send> ResultSink for ConsoleSink<W> {
    fn report_result(&mut self, _path: &Path, result: &CommandResult) {
        let title = header("Command Output:", self.color);
        self.line(&title);
        for line in limit_output(&result.output, self.length) {
            self.line(&line);
        }

        let title = header("Status Log:", self.color);
        self.line(&title);
        let status = status_line(result, self.color);
        self.line(&status);
        self.flush();
    }

    fn report_change(&mut self, path: &Path, change: &DiffChange, result: &CommandResult) {
        let rendered = format_change(path, change, self.color);
        self.line(&rendered);
        self.flush();

        let description = strip_ansi(&rendered);
        self.log_row(description.trim(), result.status);
    }

    fn report_deletion(&mut self, path: &Path) {
        let message = format!("File deleted: {}", path.display());
        let rendered = if self.color {
            message.red().bold().to_string()
        } else {
            message
        };
        self.line(&rendered);
        self.flush();

        self.log_row(&format!("{}: DELETED", path.display()), -1);
    }

    fn report_notice(&mut self, message: &str) {
        let rendered = if self.color {
            message.yellow().to_string()
        } else {
            message.to_string()
        };
        self.line(&rendered);
        self.flush();
    }

    fn report_error(&mut self, message: &str) {
        let rendered = if self.color {
            message.red().to_string()
        } else {
            message.to_string()
        };
        self.line(&rendered);
        self.flush();
    }
}
