//! Gameplay counters for the shared world.
//!
//! [`WorldMetrics`] is the plain snapshot handed to callers. The live
//! counters are atomics updated by whichever role commits an operation,
//! so recording a metric never touches the world lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters since the world was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldMetrics {
    /// Orchestrator ticks executed.
    pub ticks: u64,
    /// Committed player moves.
    pub player_moves: u64,
    /// Player moves dropped by validation (idle intents excluded).
    pub player_rejections: u64,
    /// Committed pursuer steps.
    pub pursuer_steps: u64,
    /// Pursuer steps dropped by validation at commit.
    pub pursuer_rejections: u64,
    /// Pursuer steps that landed on the player.
    pub pursuer_strikes: u64,
    /// Spawn requests turned into pursuers.
    pub spawns_drained: u64,
    /// Spawn requests discarded at drain time.
    pub spawns_discarded: u64,
    /// Items picked up by the player.
    pub items_collected: u64,
    /// Item batches placed, including the initial one.
    pub item_batches: u64,
    /// Lives removed.
    pub hits: u64,
}

#[derive(Debug, Default)]
pub(crate) struct MetricCounters {
    pub ticks: AtomicU64,
    pub player_moves: AtomicU64,
    pub player_rejections: AtomicU64,
    pub pursuer_steps: AtomicU64,
    pub pursuer_rejections: AtomicU64,
    pub pursuer_strikes: AtomicU64,
    pub spawns_drained: AtomicU64,
    pub spawns_discarded: AtomicU64,
    pub items_collected: AtomicU64,
    pub item_batches: AtomicU64,
    pub hits: AtomicU64,
}

impl MetricCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WorldMetrics {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        WorldMetrics {
            ticks: load(&self.ticks),
            player_moves: load(&self.player_moves),
            player_rejections: load(&self.player_rejections),
            pursuer_steps: load(&self.pursuer_steps),
            pursuer_rejections: load(&self.pursuer_rejections),
            pursuer_strikes: load(&self.pursuer_strikes),
            spawns_drained: load(&self.spawns_drained),
            spawns_discarded: load(&self.spawns_discarded),
            items_collected: load(&self.items_collected),
            item_batches: load(&self.item_batches),
            hits: load(&self.hits),
        }
    }
}
