//! User-facing `RealtimeSession` API and shutdown state machine.
//!
//! A session owns every role thread of one game:
//!
//! ```text
//!  horde-input          horde-orchestrator         horde-pursuer-{i} (N)
//!      |                        |                          |
//!      | source.poll()          | world.tick()             | sleep(pursuer period)
//!      | set_player_intent()    |   drain_spawned_position | advance_pursuer(i)
//!      |                        |   move_player(intent)    |
//!      |                        | frames.present()         |
//!      |                        | sleep(tick budget)       |
//!      |                                                   |
//!      |                 horde-spawner                     |
//!      |                        | sleep(spawn interval)    |
//!      |                        | try_reserve_spawn()      |
//!      |                        | queue.push_or_stop()  <-- only blocking wait
//! ```
//!
//! Shutdown ends the world, requests stop (waking every sleep and the
//! spawner's slot wait), then joins each thread against a shared
//! deadline. Threads still running at the deadline are detached and
//! reported.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use horde_core::{EndReason, PursuerId};

use crate::config::{ConfigError, SessionConfig};
use crate::frame::{FrameSink, SessionSummary};
use crate::input::{InputRole, InputSource};
use crate::orchestrator::Orchestrator;
use crate::pursuer::PursuerRole;
use crate::spawner::Spawner;
use crate::stop::StopSignal;
use crate::world::{World, WorldHandle};

/// RNG stream reserved for the spawner, distinct from item placement.
const SPAWNER_STREAM: u64 = 1;

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from the shutdown state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Total time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Role threads joined cleanly.
    pub joined: usize,
    /// Role threads that panicked.
    pub panicked: Vec<String>,
    /// Role threads still running at the join deadline, left detached.
    pub detached: Vec<String>,
    /// How the game ended.
    pub reason: Option<EndReason>,
}

// ── ShutdownState ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownState {
    Running,
    Draining,
    Joining,
    Dropped,
}

enum Joined<T> {
    Finished(T),
    Panicked,
    TimedOut,
}

/// Join `handle` unless it is still running at `deadline`.
fn join_by<T>(handle: JoinHandle<T>, deadline: Instant) -> Joined<T> {
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return Joined::TimedOut;
        }
        thread::sleep(Duration::from_millis(1));
    }
    match handle.join() {
        Ok(value) => Joined::Finished(value),
        Err(_) => Joined::Panicked,
    }
}

fn spawn_role<T, F>(name: String, body: F) -> Result<JoinHandle<T>, ConfigError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|e| ConfigError::ThreadSpawnFailed {
            reason: format!("{name}: {e}"),
        })
}

// ── RealtimeSession ──────────────────────────────────────────────

/// One running game: a shared [`World`] plus all of its role threads.
///
/// # Examples
///
/// ```no_run
/// use horde_engine::{NoInput, NullSink, RealtimeSession, SessionConfig};
///
/// let mut session = RealtimeSession::start(SessionConfig::default(), NoInput, NullSink).unwrap();
/// let summary = session.wait();
/// println!("{summary}");
/// ```
pub struct RealtimeSession {
    world: WorldHandle,
    stop: StopSignal,
    orchestrator: Option<JoinHandle<SessionSummary>>,
    roles: Vec<(String, JoinHandle<()>)>,
    summary: Option<SessionSummary>,
    state: ShutdownState,
    join_timeout: Duration,
    started: Instant,
}

impl RealtimeSession {
    /// Validate `config`, build the world, spawn every role thread, and
    /// start the game.
    ///
    /// If any thread fails to spawn, the ones already started are shut
    /// down before the error is returned.
    pub fn start<I, F>(config: SessionConfig, input: I, frames: F) -> Result<Self, ConfigError>
    where
        I: InputSource + 'static,
        F: FrameSink + 'static,
    {
        config.validate_timing()?;
        let world: WorldHandle = Arc::new(World::new(&config.world)?);

        let mut session = Self {
            world,
            stop: StopSignal::new(),
            orchestrator: None,
            roles: Vec::with_capacity(config.world.max_pursuers + 2),
            summary: None,
            state: ShutdownState::Running,
            join_timeout: config.join_timeout,
            started: Instant::now(),
        };
        // On error `session` drops here, which shuts down what was started.
        session.spawn_roles(&config, input, frames)?;

        session.world.begin();
        info!(
            pursuer_slots = config.world.max_pursuers,
            tick_ms = config.tick_period.as_millis() as u64,
            "session_started"
        );
        Ok(session)
    }

    fn spawn_roles<I, F>(
        &mut self,
        config: &SessionConfig,
        input: I,
        frames: F,
    ) -> Result<(), ConfigError>
    where
        I: InputSource + 'static,
        F: FrameSink + 'static,
    {
        let orchestrator = Orchestrator {
            world: Arc::clone(&self.world),
            stop: self.stop.clone(),
            frames,
            tick_period: config.tick_period,
            session_duration: config.session_duration,
        };
        self.orchestrator = Some(spawn_role("horde-orchestrator".into(), move || {
            orchestrator.run()
        })?);

        let mut rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        rng.set_stream(SPAWNER_STREAM);
        let spawner = Spawner {
            world: Arc::clone(&self.world),
            stop: self.stop.clone(),
            interval: config.spawn_interval,
            rng,
        };
        let name = String::from("horde-spawner");
        let handle = spawn_role(name.clone(), move || spawner.run())?;
        self.roles.push((name, handle));

        let period = config.pursuer_period()?;
        for slot in 0..config.world.max_pursuers {
            let role = PursuerRole {
                id: PursuerId(slot as u32),
                world: Arc::clone(&self.world),
                stop: self.stop.clone(),
                period,
            };
            let name = format!("horde-pursuer-{slot}");
            let handle = spawn_role(name.clone(), move || role.run())?;
            self.roles.push((name, handle));
        }

        let input = InputRole {
            world: Arc::clone(&self.world),
            stop: self.stop.clone(),
            source: input,
            poll_interval: config.input_poll_interval,
        };
        let name = String::from("horde-input");
        let handle = spawn_role(name.clone(), move || input.run())?;
        self.roles.push((name, handle));
        Ok(())
    }

    /// The shared world.
    pub fn world(&self) -> &WorldHandle {
        &self.world
    }

    /// Whether the orchestrator loop has exited.
    pub fn is_finished(&self) -> bool {
        self.orchestrator.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Final summary, once the orchestrator has been joined.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Block until the game ends (lives, time limit, or quit), then shut
    /// down the remaining roles.
    pub fn wait(&mut self) -> SessionSummary {
        if let Some(handle) = self.orchestrator.take() {
            match handle.join() {
                Ok(summary) => self.summary = Some(summary),
                Err(_) => warn!("orchestrator_panicked"),
            }
        }
        self.shutdown();
        self.final_summary()
    }

    /// Shutdown the session.
    ///
    /// 1. **Running → Draining:** end the world with
    ///    [`EndReason::Shutdown`] if it is still running, then request
    ///    stop. Every sleeping role wakes immediately; a spawner blocked on
    ///    a full queue returns its slot wait.
    /// 2. **Draining → Joining:** join the orchestrator and every role
    ///    against one `join_timeout` deadline.
    /// 3. **Joining → Dropped:** threads still running are detached and
    ///    named in the report.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.state == ShutdownState::Dropped {
            return ShutdownReport {
                total_ms: 0,
                joined: 0,
                panicked: Vec::new(),
                detached: Vec::new(),
                reason: self.world.end_reason(),
            };
        }

        let start = Instant::now();

        // Phase 1: Running → Draining
        self.state = ShutdownState::Draining;
        self.world.end(EndReason::Shutdown);
        self.stop.request_stop();

        // Phase 2: Draining → Joining
        self.state = ShutdownState::Joining;
        let deadline = start + self.join_timeout;
        let mut report = ShutdownReport {
            total_ms: 0,
            joined: 0,
            panicked: Vec::new(),
            detached: Vec::new(),
            reason: None,
        };

        if let Some(handle) = self.orchestrator.take() {
            let name = String::from("horde-orchestrator");
            match join_by(handle, deadline) {
                Joined::Finished(summary) => {
                    self.summary = Some(summary);
                    report.joined += 1;
                }
                Joined::Panicked => report.panicked.push(name),
                Joined::TimedOut => report.detached.push(name),
            }
        }
        for (name, handle) in self.roles.drain(..) {
            match join_by(handle, deadline) {
                Joined::Finished(()) => report.joined += 1,
                Joined::Panicked => report.panicked.push(name),
                Joined::TimedOut => report.detached.push(name),
            }
        }

        // Phase 3: Joining → Dropped
        self.state = ShutdownState::Dropped;
        report.total_ms = start.elapsed().as_millis() as u64;
        report.reason = self.world.end_reason();

        if !report.detached.is_empty() {
            warn!(detached = ?report.detached, "join_timeout");
        }
        if !report.panicked.is_empty() {
            warn!(panicked = ?report.panicked, "role_panicked");
        }
        info!(
            total_ms = report.total_ms,
            joined = report.joined,
            reason = ?report.reason,
            "session_shutdown"
        );
        report
    }

    fn final_summary(&self) -> SessionSummary {
        self.summary
            .clone()
            .unwrap_or_else(|| SessionSummary::from_world(&self.world, self.started.elapsed()))
    }
}

impl Drop for RealtimeSession {
    fn drop(&mut self) {
        if self.state != ShutdownState::Dropped {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::NullSink;
    use crate::input::{InputEvent, NoInput};
    use horde_core::Phase;

    fn fast_config() -> SessionConfig {
        SessionConfig {
            tick_period: Duration::from_millis(5),
            spawn_interval: Duration::from_millis(10),
            session_duration: Some(Duration::from_millis(200)),
            input_poll_interval: Duration::from_millis(1),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn lifecycle_start_and_shutdown() {
        let mut session = RealtimeSession::start(fast_config(), NoInput, NullSink).unwrap();
        assert_eq!(session.world().phase(), Phase::Running);
        thread::sleep(Duration::from_millis(30));

        let report = session.shutdown();
        // orchestrator + spawner + 3 pursuers + input
        assert_eq!(report.joined, 6);
        assert!(report.detached.is_empty());
        assert!(report.panicked.is_empty());
        assert_eq!(report.reason, Some(EndReason::Shutdown));

        let again = session.shutdown();
        assert_eq!(again.joined, 0);
    }

    #[test]
    fn wait_returns_on_time_limit() {
        let mut session = RealtimeSession::start(fast_config(), NoInput, NullSink).unwrap();
        let summary = session.wait();
        assert!(matches!(
            summary.reason,
            Some(EndReason::TimeLimit) | Some(EndReason::LivesExhausted)
        ));
        assert!(summary.ticks.0 > 0);
        assert!(session.is_finished());
        assert_eq!(session.summary(), Some(&summary));
    }

    #[test]
    fn quit_input_ends_session() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let config = SessionConfig {
            session_duration: None,
            ..fast_config()
        };
        let mut session = RealtimeSession::start(config, rx, NullSink).unwrap();
        tx.send(InputEvent::Quit).unwrap();
        let summary = session.wait();
        assert_eq!(summary.reason, Some(EndReason::Quit));
    }

    #[test]
    fn invalid_config_spawns_nothing() {
        let config = SessionConfig {
            pursuer_speed_ratio: 0.0,
            ..SessionConfig::default()
        };
        let err = RealtimeSession::start(config, NoInput, NullSink).err();
        assert_eq!(err, Some(ConfigError::InvalidSpeedRatio { value: 0.0 }));
    }

    #[test]
    fn unrepresentable_pursuer_period_is_rejected() {
        let config = SessionConfig {
            pursuer_speed_ratio: 1e-30,
            ..SessionConfig::default()
        };
        let err = RealtimeSession::start(config, NoInput, NullSink).err();
        assert_eq!(err, Some(ConfigError::InvalidSpeedRatio { value: 1e-30 }));
    }

    #[test]
    fn shutdown_budget_with_slow_tick() {
        let config = SessionConfig {
            tick_period: Duration::from_secs(30),
            spawn_interval: Duration::from_secs(30),
            session_duration: None,
            ..SessionConfig::default()
        };
        let mut session = RealtimeSession::start(config, NoInput, NullSink).unwrap();
        thread::sleep(Duration::from_millis(20));
        let report = session.shutdown();
        assert!(
            report.total_ms < 1000,
            "shutdown took too long: {}ms",
            report.total_ms
        );
        assert!(report.detached.is_empty());
    }

    #[test]
    fn drop_triggers_shutdown() {
        let session = RealtimeSession::start(fast_config(), NoInput, NullSink).unwrap();
        let world = Arc::clone(session.world());
        drop(session);
        assert_eq!(world.phase(), Phase::GameOver);
    }
}
