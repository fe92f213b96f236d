//! Orchestrator tick loop.
//!
//! One fixed-period loop drives the player side of the simulation:
//!
//! ```text
//! loop:
//!   stop requested or GameOver?        -> exit
//!   session deadline passed?           -> end(TimeLimit), exit
//!   world.tick()                       drain one spawn, move player
//!   frames.present(render_snapshot())
//!   sleep(tick_period - elapsed)       interruptible by stop
//! ```
//!
//! On exit the sink gets a final frame and a [`SessionSummary`].

use std::time::{Duration, Instant};

use tracing::{debug, info};

use horde_core::{EndReason, Phase};

use crate::frame::{FrameSink, SessionSummary};
use crate::stop::StopSignal;
use crate::world::WorldHandle;

pub(crate) struct Orchestrator<F> {
    pub world: WorldHandle,
    pub stop: StopSignal,
    pub frames: F,
    pub tick_period: Duration,
    pub session_duration: Option<Duration>,
}

impl<F: FrameSink> Orchestrator<F> {
    /// Run until stop, game over, or the session deadline.
    pub fn run(mut self) -> SessionSummary {
        let started = Instant::now();
        let deadline = self.session_duration.map(|d| started + d);
        debug!(
            tick_ms = self.tick_period.as_millis() as u64,
            "orchestrator_started"
        );

        loop {
            if self.stop.is_stopped() {
                break;
            }
            match self.world.phase() {
                Phase::GameOver => break,
                Phase::Initializing => {
                    if !self.stop.sleep(self.tick_period) {
                        break;
                    }
                    continue;
                }
                Phase::Running => {}
            }

            let tick_start = Instant::now();

            // 1. Session deadline.
            if deadline.is_some_and(|d| tick_start >= d) {
                self.world.end(EndReason::TimeLimit);
                break;
            }

            // 2. Drain one spawn and move the player.
            let result = self.world.tick();

            // 3. Hand the frame to the renderer.
            let time_left = deadline.map(|d| d.saturating_duration_since(tick_start));
            self.frames
                .present(&self.world.render_snapshot(), time_left);

            if !result.running {
                break;
            }

            // 4. Sleep for the remaining budget.
            let elapsed = tick_start.elapsed();
            if let Some(remaining) = self.tick_period.checked_sub(elapsed) {
                if !self.stop.sleep(remaining) {
                    break;
                }
            }
        }

        let time_left = deadline.map(|d| d.saturating_duration_since(Instant::now()));
        self.frames
            .present(&self.world.render_snapshot(), time_left);
        let summary = SessionSummary::from_world(&self.world, started.elapsed());
        info!(
            reason = ?summary.reason,
            score = summary.score,
            ticks = summary.ticks.0,
            "orchestrator_stopped"
        );
        self.frames.finish(&summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::snapshot::RenderSnapshot;
    use crate::world::World;
    use std::sync::Arc;

    fn running_world() -> WorldHandle {
        let world = World::new(&WorldConfig::default()).unwrap();
        world.begin();
        Arc::new(world)
    }

    #[derive(Default)]
    struct Collect {
        frames: Vec<RenderSnapshot>,
        finished: Option<SessionSummary>,
    }

    impl FrameSink for &mut Collect {
        fn present(&mut self, frame: &RenderSnapshot, _time_left: Option<Duration>) {
            self.frames.push(frame.clone());
        }

        fn finish(&mut self, summary: &SessionSummary) {
            self.finished = Some(summary.clone());
        }
    }

    #[test]
    fn deadline_ends_with_time_limit() {
        let world = running_world();
        let mut sink = Collect::default();
        let summary = Orchestrator {
            world: Arc::clone(&world),
            stop: StopSignal::new(),
            frames: &mut sink,
            tick_period: Duration::from_millis(5),
            session_duration: Some(Duration::from_millis(60)),
        }
        .run();
        assert_eq!(summary.reason, Some(EndReason::TimeLimit));
        assert!(summary.ticks.0 >= 1);
        assert_eq!(sink.finished, Some(summary.clone()));
        // One frame per tick plus the final one.
        assert_eq!(sink.frames.len() as u64, summary.ticks.0 + 1);
        assert!(!sink.frames.last().unwrap().running());
    }

    #[test]
    fn exits_when_world_already_over() {
        let world = running_world();
        world.end(EndReason::Quit);
        let mut sink = Collect::default();
        let summary = Orchestrator {
            world,
            stop: StopSignal::new(),
            frames: &mut sink,
            tick_period: Duration::from_secs(10),
            session_duration: None,
        }
        .run();
        assert_eq!(summary.reason, Some(EndReason::Quit));
        assert_eq!(summary.ticks.0, 0);
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn stop_interrupts_tick_sleep() {
        let world = running_world();
        let stop = StopSignal::new();
        let orchestrator = Orchestrator {
            world: Arc::clone(&world),
            stop: stop.clone(),
            frames: crate::frame::NullSink,
            tick_period: Duration::from_secs(30),
            session_duration: None,
        };
        let handle = std::thread::spawn(move || orchestrator.run());
        std::thread::sleep(Duration::from_millis(30));
        stop.request_stop();
        let summary = handle.join().unwrap();
        assert_eq!(summary.reason, None);
        assert!(summary.ticks.0 <= 1);
        assert!(summary.elapsed < Duration::from_secs(10));
    }
}
