//! Core types for the horde pursuit simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the grid, the pathfinding engine and the
//! concurrent world: positions and directions, cell kinds, identifiers,
//! gameplay outcomes, and the events broadcast to external collaborators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod event;
pub mod geom;
pub mod id;

pub use cell::Cell;
pub use error::{DamageOutcome, MoveOutcome, Rejection, StepOutcome};
pub use event::{EndReason, GameEvent, Phase};
pub use geom::{Direction, Position};
pub use id::{PursuerId, TickId};
