// src/indicator/spinner.rs

//! Terminal spinner drawn on stderr by a background task.

use std::io::{Write, stderr};
use std::time::Duration;

use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use tokio::sync::mpsc;
use tracing::debug;

use super::{Indicator, IndicatorMessage, IndicatorState};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(120);

/// Handle to the spinner task. Cloning shares the same task.
#[derive(Debug, Clone)]
pub struct Spinner {
    tx: mpsc::UnboundedSender<IndicatorMessage>,
}

impl Spinner {
    /// Spawn the render task. It idles until [`Indicator::start`].
    pub fn spawn(label: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(render_loop(label.into(), rx));
        Self { tx }
    }

    fn send(&self, msg: IndicatorMessage) {
        if self.tx.send(msg).is_err() {
            debug!(?msg, "spinner task already finished");
        }
    }
}

impl Indicator for Spinner {
    fn start(&mut self) {
        self.send(IndicatorMessage::Start);
    }

    fn stop(&mut self) {
        self.send(IndicatorMessage::Stop);
    }

    fn pause(&mut self) {
        self.send(IndicatorMessage::Pause);
    }

    fn resume(&mut self) {
        self.send(IndicatorMessage::Resume);
    }
}

async fn render_loop(label: String, mut rx: mpsc::UnboundedReceiver<IndicatorMessage>) {
    let mut state = IndicatorState::Idle;
    let mut frame = 0usize;
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                let next = state.apply(msg);
                if state.is_animating() && !next.is_animating() {
                    clear_line();
                }
                state = next;
                if state == IndicatorState::Stopped {
                    break;
                }
            }
            _ = ticker.tick(), if state.is_animating() => {
                draw(FRAMES[frame % FRAMES.len()], &label);
                frame = frame.wrapping_add(1);
            }
        }
    }

    debug!("spinner task finished");
}

fn draw(frame: &str, label: &str) {
    let mut err = stderr();
    let res = queue!(
        err,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(frame.cyan()),
        Print(" "),
        Print(label.dim())
    )
    .and_then(|_| err.flush());
    if let Err(e) = res {
        debug!(error = %e, "failed to draw spinner frame");
    }
}

fn clear_line() {
    let mut err = stderr();
    let res = queue!(err, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))
        .and_then(|_| err.flush());
    if let Err(e) = res {
        debug!(error = %e, "failed to clear spinner line");
    }
}
