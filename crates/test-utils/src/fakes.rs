//! Recording fakes for the coordinator's collaborators.
//!
//! Each fake shares its log through an `Arc<Mutex<..>>` so the test keeps a
//! handle after moving the fake into a `Coordinator`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use gentr::diff::DiffChange;
use gentr::exec::{CommandResult, CommandRunner, Outcome, substitute_placeholder};
use gentr::indicator::{Indicator, IndicatorMessage};
use gentr::report::ResultSink;

/// Everything a [`RecordingSink`] was told, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRecord {
    Result { path: PathBuf, result: CommandResult },
    Change { path: PathBuf, change: DiffChange, status: i32 },
    Deletion(PathBuf),
    Notice(String),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<SinkRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().unwrap().clone()
    }

    fn push(&self, record: SinkRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl ResultSink for RecordingSink {
    fn report_result(&mut self, path: &Path, result: &CommandResult) {
        self.push(SinkRecord::Result {
            path: path.to_path_buf(),
            result: result.clone(),
        });
    }

    fn report_change(&mut self, path: &Path, change: &DiffChange, result: &CommandResult) {
        self.push(SinkRecord::Change {
            path: path.to_path_buf(),
            change: change.clone(),
            status: result.status,
        });
    }

    fn report_deletion(&mut self, path: &Path) {
        self.push(SinkRecord::Deletion(path.to_path_buf()));
    }

    fn report_notice(&mut self, message: &str) {
        self.push(SinkRecord::Notice(message.to_string()));
    }

    fn report_error(&mut self, message: &str) {
        self.push(SinkRecord::Error(message.to_string()));
    }
}

/// Indicator that logs every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingIndicator {
    calls: Arc<Mutex<Vec<IndicatorMessage>>>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<IndicatorMessage> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, msg: IndicatorMessage) {
        self.calls.lock().unwrap().push(msg);
    }
}

impl Indicator for RecordingIndicator {
    fn start(&mut self) {
        self.push(IndicatorMessage::Start);
    }

    fn stop(&mut self) {
        self.push(IndicatorMessage::Stop);
    }

    fn pause(&mut self) {
        self.push(IndicatorMessage::Pause);
    }

    fn resume(&mut self) {
        self.push(IndicatorMessage::Resume);
    }
}

/// One recorded runner invocation.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub command: String,
    pub path: PathBuf,
    /// Tokio clock at the time of the call, for debounce assertions.
    pub at: Instant,
}

/// Runner that never spawns anything.
///
/// Every call is recorded and answered with the configured status and
/// output.
#[derive(Debug, Clone)]
pub struct FakeRunner {
    runs: Arc<Mutex<Vec<RunRecord>>>,
    status: i32,
    output: String,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self {
            runs: Arc::default(),
            status: 0,
            output: "ok\n".to_string(),
        }
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn runs(&self) -> Vec<RunRecord> {
        self.runs.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a mut self,
        template: &'a str,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        let command = substitute_placeholder(template, path);
        self.runs.lock().unwrap().push(RunRecord {
            command: command.clone(),
            path: path.to_path_buf(),
            at: Instant::now(),
        });

        let outcome = if self.status == 0 {
            Outcome::Success
        } else {
            Outcome::NonZeroExit
        };
        let result = CommandResult {
            output: self.output.clone(),
            status: self.status,
            outcome,
            command,
        };
        Box::pin(async move { result })
    }
}
