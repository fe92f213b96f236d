//! The obstacle view searched by the pathfinding engine.

use horde_core::{Direction, Position};
use smallvec::SmallVec;

/// Read-only obstacle map of a rectangular grid.
///
/// Implemented by the mutable [`Grid`](crate::Grid) and by the immutable
/// [`WallMask`](crate::WallMask). Only walls and out-of-bounds cells block;
/// dynamic entities are not obstacles here.
///
/// # Thread Safety
///
/// `Sync` is required because pursuer roles search a shared wall view
/// from several threads at once.
pub trait Terrain: Send + Sync {
    /// Number of columns.
    fn width(&self) -> u32;

    /// Number of rows.
    fn height(&self) -> u32;

    /// Whether `pos` is a wall or outside the grid.
    fn is_blocked(&self, pos: Position) -> bool;

    /// Whether `pos` lies inside the grid.
    fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.width()
            && (pos.y as u32) < self.height()
    }

    /// Row-major flat index of `pos`, or `None` when out of bounds.
    fn index_of(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width() as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Inverse of [`index_of`](Terrain::index_of).
    fn position_of(&self, index: usize) -> Position {
        let w = self.width() as usize;
        Position::new((index % w) as i32, (index / w) as i32)
    }

    /// Walkable 4-connected neighbours in up, down, left, right order.
    fn open_neighbours(&self, pos: Position) -> SmallVec<[Position; 4]> {
        Direction::CARDINALS
            .iter()
            .map(|&d| pos.step(d))
            .filter(|&n| !self.is_blocked(n))
            .collect()
    }
}
