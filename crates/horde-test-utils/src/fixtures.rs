//! Host-side stand-ins for the session seams.
//!
//! - [`RecordingSink`] keeps every presented frame and the final summary.
//! - [`ScriptedInput`] replays a fixed list of input events.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use horde_engine::{FrameSink, InputEvent, InputSource, RenderSnapshot, SessionSummary};

#[derive(Default)]
struct Recorded {
    frames: Vec<RenderSnapshot>,
    summary: Option<SessionSummary>,
}

/// Frame sink that records into a shared log.
///
/// The session takes ownership of the sink; keep the [`FrameLog`] from
/// [`RecordingSink::new`] to inspect what was presented.
pub struct RecordingSink {
    log: Arc<Mutex<Recorded>>,
}

/// Read side of a [`RecordingSink`].
#[derive(Clone)]
pub struct FrameLog {
    log: Arc<Mutex<Recorded>>,
}

impl RecordingSink {
    pub fn new() -> (Self, FrameLog) {
        let log = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                log: Arc::clone(&log),
            },
            FrameLog { log },
        )
    }
}

impl FrameSink for RecordingSink {
    fn present(&mut self, frame: &RenderSnapshot, _time_left: Option<Duration>) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frames
            .push(frame.clone());
    }

    fn finish(&mut self, summary: &SessionSummary) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .summary = Some(summary.clone());
    }
}

impl FrameLog {
    /// Number of frames presented so far.
    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every frame presented so far.
    pub fn frames(&self) -> Vec<RenderSnapshot> {
        self.lock().frames.clone()
    }

    pub fn last(&self) -> Option<RenderSnapshot> {
        self.lock().frames.last().cloned()
    }

    /// Summary handed to [`FrameSink::finish`], if the session got that far.
    pub fn summary(&self) -> Option<SessionSummary> {
        self.lock().summary.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Input source that replays a script, one event per `every` polls.
///
/// With `every == 1` each poll yields the next event until the script is
/// exhausted. Larger values space events out over idle polls, which the
/// input role turns into poll-interval sleeps.
pub struct ScriptedInput {
    script: VecDeque<InputEvent>,
    every: u32,
    polls: u32,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = InputEvent>) -> Self {
        Self::spaced(script, 1)
    }

    /// Script spaced out to one event every `every` polls (minimum 1).
    pub fn spaced(script: impl IntoIterator<Item = InputEvent>, every: u32) -> Self {
        Self {
            script: script.into_iter().collect(),
            every: every.max(1),
            polls: 0,
        }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<InputEvent> {
        self.polls += 1;
        if self.polls < self.every {
            return None;
        }
        self.polls = 0;
        self.script.pop_front()
    }
}
