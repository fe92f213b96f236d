//! Grid storage and pathfinding for horde simulations.
//!
//! This crate defines the [`Terrain`] trait (the obstacle view that the
//! pathfinding engine searches), the mutable [`Grid`] cell matrix owned by
//! the world, and the immutable [`WallMask`] that pursuer roles search
//! without holding the world lock.
//!
//! # Pathfinding
//!
//! [`pathfinding::next_step`] is a pure breadth-first search producing the
//! first step of a shortest 4-connected path. It allocates fresh tables on
//! every call, so any number of threads may call it concurrently.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod pathfinding;
pub mod terrain;
pub mod walls;

pub use error::GridError;
pub use grid::Grid;
pub use pathfinding::{distance, next_step};
pub use terrain::Terrain;
pub use walls::WallMask;
