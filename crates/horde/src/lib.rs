//! Horde: a concurrent, tick-driven pursuit simulation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all horde sub-crates. For most users, adding `horde` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use horde::prelude::*;
//!
//! // A running 20×20 world with up to 3 pursuers and 5 items per batch.
//! let world = horde::engine::initialize(20, 20, 3, 5).unwrap();
//! world.set_player_intent(Direction::Up);
//!
//! let result = world.tick();
//! assert_eq!(result.player, Position::new(10, 9));
//! assert_eq!(world.lives(), 3);
//! ```
//!
//! For wall-clock play, hand a [`SessionConfig`](engine::SessionConfig),
//! an input source and a frame sink to
//! [`RealtimeSession::start`](engine::RealtimeSession::start).
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `horde-core` | Positions, cells, ids, outcomes, events |
//! | [`grid`] | `horde-grid` | Grid storage, wall masks, BFS pathfinding |
//! | [`engine`] | `horde-engine` | Shared world, spawn queue, roles, sessions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`horde-core`).
pub use horde_core as types;

/// Grid storage and pathfinding (`horde-grid`).
///
/// [`grid::next_step`] is the pure search every pursuer runs; it accepts
/// any [`grid::Terrain`].
pub use horde_grid as grid;

/// Shared world and realtime session (`horde-engine`).
///
/// [`engine::World`] for direct stepping, [`engine::RealtimeSession`] for
/// autonomous role threads.
pub use horde_engine as engine;

/// Common imports for typical horde usage.
///
/// ```rust
/// use horde::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use horde_core::{
        Cell, Direction, EndReason, GameEvent, Phase, Position, PursuerId, TickId,
    };

    // Outcomes
    pub use horde_core::{DamageOutcome, MoveOutcome, Rejection, StepOutcome};

    // Grid
    pub use horde_grid::{next_step, Grid, Terrain, WallMask};

    // Engine
    pub use horde_engine::{
        FrameSink, InputEvent, InputSource, RealtimeSession, RenderSnapshot, SessionConfig,
        SessionSummary, World, WorldConfig, WorldHandle,
    };
}
