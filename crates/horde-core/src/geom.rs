//! Grid positions and movement directions.

use std::fmt;

/// Movement direction for the player and pursuers.
///
/// `None` means "hold position": stepping in it returns the same cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
    /// No movement.
    #[default]
    None,
}

impl Direction {
    /// The four movement directions in exploration order.
    ///
    /// Pathfinding expands neighbours in exactly this order, which fixes
    /// tie-breaking between equally short paths.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(dx, dy)` offset of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

/// An integer `(x, y)` grid coordinate.
///
/// `x` is the column (growing right) and `y` the row (growing down).
/// Positions may lie outside any particular grid; bounds are checked by
/// the grid that interprets them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// The four 4-connected neighbours in [`Direction::CARDINALS`] order.
    pub fn neighbours(self) -> [Position; 4] {
        Direction::CARDINALS.map(|d| self.step(d))
    }

    /// Manhattan (L1) distance.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn step_follows_screen_axes() {
        let p = Position::new(5, 5);
        assert_eq!(p.step(Direction::Up), Position::new(5, 4));
        assert_eq!(p.step(Direction::Down), Position::new(5, 6));
        assert_eq!(p.step(Direction::Left), Position::new(4, 5));
        assert_eq!(p.step(Direction::Right), Position::new(6, 5));
        assert_eq!(p.step(Direction::None), p);
    }

    #[test]
    fn neighbours_in_exploration_order() {
        let n = Position::new(2, 2).neighbours();
        assert_eq!(
            n,
            [
                Position::new(2, 1),
                Position::new(2, 3),
                Position::new(1, 2),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn adjacency_excludes_diagonals_and_self() {
        let p = Position::new(3, 3);
        assert!(p.is_adjacent(Position::new(3, 4)));
        assert!(!p.is_adjacent(Position::new(4, 4)));
        assert!(!p.is_adjacent(p));
    }

    proptest! {
        #[test]
        fn every_neighbour_is_adjacent(x in -1000i32..1000, y in -1000i32..1000) {
            let p = Position::new(x, y);
            for n in p.neighbours() {
                prop_assert!(p.is_adjacent(n));
            }
        }

        #[test]
        fn manhattan_is_symmetric(
            ax in -1000i32..1000, ay in -1000i32..1000,
            bx in -1000i32..1000, by in -1000i32..1000,
        ) {
            let a = Position::new(ax, ay);
            let b = Position::new(bx, by);
            prop_assert_eq!(a.manhattan(b), b.manhattan(a));
        }
    }
}
