//! Grid cell kinds and their map symbols.

/// Contents of one grid cell.
///
/// Dynamic entities (player, pursuers) are not cells: they live in the
/// world roster and are overlaid on the grid when rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Walkable floor.
    #[default]
    Empty,
    /// Permanent obstacle.
    Wall,
    /// Walkable floor holding a collectible item.
    Item,
}

impl Cell {
    /// Symbol used in ASCII maps and plain-text snapshots.
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Item => '$',
        }
    }

    /// Parse an ASCII map symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | ' ' => Some(Self::Empty),
            '#' => Some(Self::Wall),
            '$' => Some(Self::Item),
            _ => None,
        }
    }

    /// Whether entities may stand on this cell.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}
