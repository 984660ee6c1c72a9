// src/report/session_log.rs

//! Append-only per-run session log.
//!
//! Layout:
//!
//! ```text
//! # Options: --debug false; --recursive false; ...
//! # Command: cargo check
//! # Timestamp: 2024-05-01T10:00:00+02:00
//! --------------------------------------------------------------------------------
//! Output\tExitStatus
//! --------------------------------------------------------------------------------
//! src/a.rs:3 MOD: old -> new\tExitStatus: 0
//! src/b.rs: DELETED\tExitStatus: -1
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;

use super::format::strip_ansi;

const SEPARATOR_WIDTH: usize = 80;

/// File name for a run started at `started`, e.g. `2024-05-01T10-00-00.log`.
pub fn session_file_name(started: &DateTime<Local>) -> String {
    format!("{}.log", started.format("%Y-%m-%dT%H-%M-%S"))
}

#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    file: File,
}

impl SessionLog {
    /// Create (or truncate) the log in `dir` and write the header block.
    pub fn create(
        dir: &Path,
        started: DateTime<Local>,
        options_summary: &str,
        command: &str,
    ) -> Result<Self> {
        let path = dir.join(session_file_name(&started));
        let mut file = File::create(&path)
            .with_context(|| format!("creating session log file {:?}", path))?;

        let separator = "-".repeat(SEPARATOR_WIDTH);
        let header = format!(
            "# Options: {}\n# Command: {}\n# Timestamp: {}\n{separator}\nOutput\tExitStatus\n{separator}\n",
            strip_ansi(options_summary),
            command,
            started.to_rfc3339(),
        );
        file.write_all(header.as_bytes())
            .with_context(|| format!("writing session log header to {:?}", path))?;
        drop(file);

        // Reopen in append mode so every record lands at the end.
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .with_context(|| format!("opening session log {:?} for append", path))?;

        info!(path = ?path, "created session log");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `description<TAB>ExitStatus: N` row.
    pub fn append(&mut self, description: &str, status: i32) -> Result<()> {
        let row = format!(
            "{}\t{}\n",
            tsv_field(&strip_ansi(description)),
            tsv_field(&format!("ExitStatus: {status}")),
        );
        self.file
            .write_all(row.as_bytes())
            .and_then(|_| self.file.flush())
            .with_context(|| format!("appending to session log {:?}", self.path))
    }

    /// Swap the handle for a read-only one so every later append fails.
    #[cfg(test)]
    pub(crate) fn reopen_read_only(&mut self) -> Result<()> {
        self.file = File::open(&self.path)
            .with_context(|| format!("reopening session log {:?}", self.path))?;
        Ok(())
    }
}

/// Quote a field when it would break the two-column layout.
fn tsv_field(field: &str) -> String {
    if field.contains(['\t', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
