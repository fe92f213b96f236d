//! Where rendered frames go.

use std::fmt;
use std::time::Duration;

use crossbeam_channel::Sender;

use horde_core::{EndReason, TickId};

use crate::metrics::WorldMetrics;
use crate::snapshot::RenderSnapshot;
use crate::world::World;

/// Consumer of per-tick snapshots, implemented by the host renderer.
pub trait FrameSink: Send {
    /// Called once per orchestrator tick with a fresh snapshot and the
    /// session time left, if the session has a deadline.
    fn present(&mut self, frame: &RenderSnapshot, time_left: Option<Duration>);

    /// Called once when the orchestrator exits.
    fn finish(&mut self, summary: &SessionSummary) {
        let _ = summary;
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &RenderSnapshot, _time_left: Option<Duration>) {}
}

/// Forwards frames to a channel. A full or closed channel drops the
/// frame; rendering never stalls the simulation.
impl FrameSink for Sender<RenderSnapshot> {
    fn present(&mut self, frame: &RenderSnapshot, _time_left: Option<Duration>) {
        let _ = self.try_send(frame.clone());
    }
}

impl FrameSink for Box<dyn FrameSink> {
    fn present(&mut self, frame: &RenderSnapshot, time_left: Option<Duration>) {
        (**self).present(frame, time_left)
    }

    fn finish(&mut self, summary: &SessionSummary) {
        (**self).finish(summary)
    }
}

/// Final state of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Why the session ended, if it did.
    pub reason: Option<EndReason>,
    /// Final score.
    pub score: u64,
    /// Lives left.
    pub lives: u32,
    /// Ticks executed.
    pub ticks: TickId,
    /// Pursuers admitted.
    pub pursuers: usize,
    /// Wall-clock time the orchestrator ran.
    pub elapsed: Duration,
    /// Final counters.
    pub metrics: WorldMetrics,
}

impl SessionSummary {
    /// Summarize `world` as it stands now.
    pub fn from_world(world: &World, elapsed: Duration) -> Self {
        Self {
            reason: world.end_reason(),
            score: world.score(),
            lives: world.lives(),
            ticks: world.current_tick(),
            pursuers: world.pursuer_count(),
            elapsed,
            metrics: world.metrics(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Some(reason) => write!(f, "GAME OVER ({reason})")?,
            None => write!(f, "SESSION STOPPED")?,
        }
        write!(
            f,
            ": score {} | lives {} | {} ticks",
            self.score, self.lives, self.ticks
        )
    }
}
