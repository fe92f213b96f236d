//! Test utilities and scripted collaborators for horde development.
//!
//! Provides config builders with fast timings, a [`wait_until`] poll
//! helper for cross-thread assertions, and host-side stand-ins for the
//! session seams: [`RecordingSink`] for frames and [`ScriptedInput`] for
//! keyboard input.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::thread;
use std::time::{Duration, Instant};

use horde_core::{Position, PursuerId};
use horde_engine::{Layout, SessionConfig, SpawnRequest, World, WorldConfig};

pub use fixtures::{FrameLog, RecordingSink, ScriptedInput};

/// Seed shared by every fixture config.
pub const TEST_SEED: u64 = 0x5eed;

/// Bordered `width x height` world with default population and items.
pub fn world_config(width: u32, height: u32) -> WorldConfig {
    WorldConfig {
        width,
        height,
        seed: TEST_SEED,
        ..WorldConfig::default()
    }
}

/// World built from an ASCII map (`#` wall, `.` empty, `$` item).
pub fn map_config(rows: &[&str]) -> WorldConfig {
    WorldConfig {
        layout: Layout::Rows(rows.iter().map(|r| r.to_string()).collect()),
        seed: TEST_SEED,
        ..WorldConfig::default()
    }
}

/// Session timings scaled down to milliseconds: 5 ms ticks, 10 ms spawn
/// cycles, 1 ms input polls, no time limit.
pub fn fast_session(world: WorldConfig) -> SessionConfig {
    SessionConfig {
        world,
        tick_period: Duration::from_millis(5),
        spawn_interval: Duration::from_millis(10),
        session_duration: None,
        input_poll_interval: Duration::from_millis(1),
        ..SessionConfig::default()
    }
}

/// Reserve, enqueue and admit a pursuer at `at` in one go.
///
/// Assumes the spawn queue is otherwise empty. Returns `None` if the
/// population is full or the drain discarded the request.
pub fn spawn_pursuer_at(world: &World, at: Position) -> Option<PursuerId> {
    if !world.try_reserve_spawn() {
        return None;
    }
    if world.spawn_queue().try_push(SpawnRequest::new(at)).is_err() {
        world.release_spawn_reservation();
        return None;
    }
    world.drain_spawned_position()
}

/// Poll `cond` every millisecond until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
}
