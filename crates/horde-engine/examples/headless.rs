//! Headless horde session with an item-seeking autopilot.
//!
//! Demonstrates:
//!   1. Building a `SessionConfig` with demo timings
//!   2. Feeding input through a channel `InputSource`
//!   3. Receiving frames through a channel `FrameSink`
//!   4. Steering with the same BFS the pursuers use
//!
//! Run with:
//!   RUST_LOG=horde_engine=debug cargo run --example headless

use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError};
use horde_core::{Cell, Direction, Position};
use horde_engine::{InputEvent, RealtimeSession, RenderSnapshot, SessionConfig};
use horde_grid::{distance, next_step};
use tracing_subscriber::EnvFilter;

// ─── Demo parameters ────────────────────────────────────────────

const PRINT_EVERY: u64 = 10;

fn demo_config() -> SessionConfig {
    SessionConfig {
        tick_period: Duration::from_millis(100),
        spawn_interval: Duration::from_millis(1500),
        session_duration: Some(Duration::from_secs(15)),
        ..SessionConfig::default()
    }
}

// ─── Autopilot ──────────────────────────────────────────────────

/// Direction of the first step toward the closest reachable item.
fn steer(frame: &RenderSnapshot) -> Direction {
    let target = frame
        .grid
        .positions_of(Cell::Item)
        .filter_map(|at| distance(frame.player, at, &frame.grid).map(|d| (d, at)))
        .min();
    let Some((_, target)) = target else {
        return Direction::None;
    };
    let step = next_step(frame.player, target, &frame.grid);
    direction_to(frame.player, step)
}

fn direction_to(from: Position, to: Position) -> Direction {
    Direction::CARDINALS
        .into_iter()
        .find(|&d| from.step(d) == to)
        .unwrap_or(Direction::None)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();

    let (input_tx, input_rx) = unbounded();
    let (frame_tx, frame_rx) = bounded(4);
    let mut session = match RealtimeSession::start(demo_config(), input_rx, frame_tx) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("failed to start session: {e}");
            std::process::exit(1);
        }
    };

    loop {
        match frame_rx.recv_timeout(Duration::from_secs(1)) {
            Ok(frame) => {
                if frame.tick.0 % PRINT_EVERY == 0 || !frame.running() {
                    println!("tick {}\n{frame}", frame.tick);
                }
                if !frame.running() {
                    break;
                }
                let _ = input_tx.send(InputEvent::Steer(steer(&frame)));
            }
            Err(RecvTimeoutError::Timeout) if !session.is_finished() => continue,
            Err(_) => break,
        }
    }

    let summary = session.wait();
    println!("{summary}");
    let m = &summary.metrics;
    println!(
        "  items {} | pursuer steps {} | strikes {} | spawns {} (discarded {})",
        m.items_collected, m.pursuer_steps, m.pursuer_strikes, m.spawns_drained, m.spawns_discarded
    );
}
