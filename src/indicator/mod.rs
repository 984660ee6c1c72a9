// src/indicator/mod.rs

//! Presentation collaborator driven by the coordinator.
//!
//! The coordinator only depends on the [`Indicator`] capability set. The
//! lifecycle is modelled as an explicit state machine ([`IndicatorState`]
//! fed with [`IndicatorMessage`]s) so it can be tested without a terminal.

use tracing::trace;

pub mod spinner;

pub use spinner::Spinner;

/// Start/stop/pause/resume contract consumed by the coordinator.
pub trait Indicator: Send {
    fn start(&mut self);
    fn stop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Discrete control messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorMessage {
    Start,
    Stop,
    Pause,
    Resume,
}

/// Indicator lifecycle.
///
/// `Running` and `Paused` are the two working states; `Idle` is before
/// `start`, `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
}

impl IndicatorState {
    /// Apply one message. Messages that make no sense in the current state
    /// are ignored.
    pub fn apply(self, msg: IndicatorMessage) -> Self {
        use IndicatorMessage as M;
        use IndicatorState as S;

        match (self, msg) {
            (S::Stopped, _) => S::Stopped,
            (_, M::Stop) => S::Stopped,
            (S::Idle, M::Start) => S::Running,
            (S::Running, M::Pause) => S::Paused,
            (S::Paused, M::Resume) => S::Running,
            (state, _) => state,
        }
    }

    /// Whether frames should be drawn.
    pub fn is_animating(self) -> bool {
        self == IndicatorState::Running
    }
}

/// Indicator that draws nothing and only tracks state.
///
/// Used when stderr is not a terminal or in debug mode, where log lines
/// would interleave with the animation.
#[derive(Debug, Default)]
pub struct SilentIndicator {
    state: IndicatorState,
}

impl SilentIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    fn apply(&mut self, msg: IndicatorMessage) {
        self.state = self.state.apply(msg);
        trace!(?msg, state = ?self.state, "indicator transition");
    }
}

impl Indicator for SilentIndicator {
    fn start(&mut self) {
        self.apply(IndicatorMessage::Start);
    }

    fn stop(&mut self) {
        self.apply(IndicatorMessage::Stop);
    }

    fn pause(&mut self) {
        self.apply(IndicatorMessage::Pause);
    }

    fn resume(&mut self) {
        self.apply(IndicatorMessage::Resume);
    }
}

impl<T: Indicator + ?Sized> Indicator for Box<T> {
    fn start(&mut self) {
        (**self).start();
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn resume(&mut self) {
        (**self).resume();
    }
}
