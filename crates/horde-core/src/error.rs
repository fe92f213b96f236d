//! Outcome types for world mutations.
//!
//! Nothing in the simulation core is fatal. Every mutation that fails
//! validation is a silent no-op, reported back as a value so callers and
//! tests can observe why. [`Rejection`] is the taxonomy of those no-ops.

use std::error::Error;
use std::fmt;

use crate::geom::Position;

/// Why a proposed move was not committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The world is not in the `Running` phase.
    NotRunning,
    /// The intent was [`Direction::None`](crate::Direction::None).
    Idle,
    /// The target lies outside the grid.
    OutOfBounds,
    /// The target is a wall cell.
    Wall,
    /// The target is held by a pursuer (occupancy conflict).
    Occupied,
    /// No pursuer with this id has been admitted yet.
    UnknownPursuer,
    /// The pursuer moved between planning and commit.
    Stale,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRunning => write!(f, "world is not running"),
            Self::Idle => write!(f, "no movement requested"),
            Self::OutOfBounds => write!(f, "target is out of bounds"),
            Self::Wall => write!(f, "target is a wall"),
            Self::Occupied => write!(f, "target is occupied by a pursuer"),
            Self::UnknownPursuer => write!(f, "unknown pursuer"),
            Self::Stale => write!(f, "pursuer moved since the step was planned"),
        }
    }
}

impl Error for Rejection {}

/// Result of a player move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player now stands on this cell.
    Moved(Position),
    /// The move was dropped.
    Rejected(Rejection),
}

impl MoveOutcome {
    /// Whether the move was committed.
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Result of one pursuer advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The pursuer moved one cell.
    Moved {
        /// Cell before the step.
        from: Position,
        /// Cell after the step.
        to: Position,
    },
    /// The step reached the player's cell: the pursuer holds its
    /// position and the player takes a hit.
    Struck {
        /// Cell the pursuer holds.
        at: Position,
    },
    /// No step was needed or possible (already there, or no path).
    Held {
        /// Cell the pursuer holds.
        at: Position,
    },
    /// The proposed step failed validation at commit time.
    Rejected(Rejection),
}

/// Result of applying damage to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// One life was removed.
    Hit {
        /// Lives left after the hit.
        lives_left: u32,
    },
    /// A hit was already recorded during this tick.
    AlreadyHit,
    /// The game is already over.
    NotRunning,
}
