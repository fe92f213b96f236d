//! Lifecycle phase, end reasons, and gameplay events.

use std::fmt;

use crate::geom::Position;
use crate::id::PursuerId;

/// World lifecycle phase.
///
/// Transitions are one-way: `Initializing -> Running -> GameOver`.
/// `GameOver` is terminal; every role observes it and stops issuing
/// new operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// World constructed, roles may be starting; nothing mutates yet.
    Initializing = 0,
    /// Simulation is live.
    Running = 1,
    /// Session ended.
    GameOver = 2,
}

impl Phase {
    /// Decode from the atomic representation. Unknown values map to
    /// `GameOver` so a corrupted flag can only stop the simulation.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Initializing,
            1 => Self::Running,
            _ => Self::GameOver,
        }
    }
}

/// Why a session reached `GameOver`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Lives reached zero.
    LivesExhausted,
    /// The session wall-clock deadline elapsed.
    TimeLimit,
    /// The input role requested quit.
    Quit,
    /// The host shut the session down.
    Shutdown,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LivesExhausted => write!(f, "the player was caught"),
            Self::TimeLimit => write!(f, "time limit reached"),
            Self::Quit => write!(f, "player quit"),
            Self::Shutdown => write!(f, "session shut down"),
        }
    }
}

/// Gameplay event broadcast to external collaborators (audio, HUD).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The player picked up an item.
    ItemCollected {
        /// Cell the item was on.
        at: Position,
        /// Score after the pickup.
        score: u64,
    },
    /// A fresh batch of items was placed.
    ItemsRespawned {
        /// Number of items placed.
        count: usize,
    },
    /// The player lost a life.
    PlayerHit {
        /// The pursuer responsible, if the hit came from a pursuer step.
        by: Option<PursuerId>,
        /// Lives left after the hit.
        lives_left: u32,
    },
    /// A pursuer joined the roster.
    PursuerSpawned {
        /// Id of the new pursuer.
        id: PursuerId,
        /// Spawn cell.
        at: Position,
    },
    /// The session ended.
    GameOver {
        /// Why it ended.
        reason: EndReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_round_trips_through_u8() {
        for phase in [Phase::Initializing, Phase::Running, Phase::GameOver] {
            assert_eq!(Phase::from_u8(phase as u8), phase);
        }
        assert_eq!(Phase::from_u8(200), Phase::GameOver);
    }
}
