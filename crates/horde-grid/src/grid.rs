//! Rectangular cell matrix with permanent walls and collectible items.

use std::sync::Arc;

use horde_core::{Cell, Position};

use crate::error::GridError;
use crate::terrain::Terrain;
use crate::walls::WallMask;

/// A fixed-size rectangular matrix of [`Cell`]s.
///
/// Cells are stored row-major. Dimensions never change after
/// construction, and neither do walls: item placement only toggles
/// `Empty <-> Item`. That makes the [`WallMask`] extracted from a grid
/// valid for the grid's whole lifetime.
///
/// `Grid` carries no synchronization of its own. Inside the engine it is
/// owned by the world state and only touched under the world lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Maximum size of either dimension.
    pub const MAX_DIM: u32 = 4096;

    /// Create an empty grid surrounded by a one-cell wall border.
    ///
    /// Returns `Err(GridError::TooSmall)` unless both dimensions are at
    /// least 3 (one interior cell), or `Err(GridError::DimensionTooLarge)`
    /// if either exceeds [`MAX_DIM`](Self::MAX_DIM).
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_core::{Cell, Position};
    /// use horde_grid::Grid;
    ///
    /// let grid = Grid::bordered(20, 20).unwrap();
    /// assert_eq!(grid.cell(Position::new(0, 0)), Some(Cell::Wall));
    /// assert_eq!(grid.cell(Position::new(10, 10)), Some(Cell::Empty));
    /// ```
    pub fn bordered(width: u32, height: u32) -> Result<Self, GridError> {
        check_dim("width", width)?;
        check_dim("height", height)?;
        if width < 3 || height < 3 {
            return Err(GridError::TooSmall { width, height });
        }
        let mut cells = vec![Cell::Empty; width as usize * height as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    cells[(y * width + x) as usize] = Cell::Wall;
                }
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse an ASCII map: `#` wall, `.` (or space) empty, `$` item.
    ///
    /// Every row must have the same length. No border is added.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let first = rows.first().ok_or(GridError::EmptyGrid)?;
        let expected = first.as_ref().chars().count();
        if expected == 0 {
            return Err(GridError::EmptyGrid);
        }
        let width = u32::try_from(expected).unwrap_or(u32::MAX);
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        check_dim("width", width)?;
        check_dim("height", height)?;

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(GridError::RaggedRows {
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let cell =
                    Cell::from_symbol(symbol).ok_or(GridError::UnknownSymbol { symbol, x, y })?;
                cells.push(cell);
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The centre cell `(width / 2, height / 2)`.
    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Cell at `pos`, or `None` when out of bounds.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index_of(pos).map(|i| self.cells[i])
    }

    /// Whether `pos` is a wall. Out-of-bounds positions are not walls.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Wall)
    }

    /// Turn an `Empty` cell into an `Item`. Returns `false` (and changes
    /// nothing) for any other cell or for out-of-bounds positions.
    pub fn place_item(&mut self, pos: Position) -> bool {
        match self.index_of(pos) {
            Some(i) if self.cells[i] == Cell::Empty => {
                self.cells[i] = Cell::Item;
                true
            }
            _ => false,
        }
    }

    /// Clear an `Item` cell back to `Empty`. Returns whether an item was
    /// taken.
    pub fn take_item(&mut self, pos: Position) -> bool {
        match self.index_of(pos) {
            Some(i) if self.cells[i] == Cell::Item => {
                self.cells[i] = Cell::Empty;
                true
            }
            _ => false,
        }
    }

    /// Number of `Item` cells.
    pub fn item_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Item).count()
    }

    /// Positions holding `kind`, in row-major order.
    pub fn positions_of(&self, kind: Cell) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == kind)
            .map(|(i, _)| self.position_of(i))
    }

    /// Immutable obstacle view sharing nothing with this grid.
    pub fn wall_mask(&self) -> WallMask {
        let blocked: Arc<[bool]> = self.cells.iter().map(|&c| c == Cell::Wall).collect();
        WallMask::new(self.width, self.height, blocked)
    }

    /// One string per row using [`Cell::symbol`].
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

impl Terrain for Grid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_blocked(&self, pos: Position) -> bool {
        match self.index_of(pos) {
            Some(i) => self.cells[i] == Cell::Wall,
            None => true,
        }
    }
}

fn check_dim(name: &'static str, value: u32) -> Result<(), GridError> {
    if value == 0 {
        return Err(GridError::EmptyGrid);
    }
    if value > Grid::MAX_DIM {
        return Err(GridError::DimensionTooLarge {
            name,
            value,
            max: Grid::MAX_DIM,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn bordered_has_wall_ring_and_open_interior() {
        let g = Grid::bordered(5, 4).unwrap();
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 4);
        assert_eq!(g.cell_count(), 20);
        // 5*4 - 3*2 interior cells
        assert_eq!(g.positions_of(Cell::Wall).count(), 14);
        assert_eq!(g.positions_of(Cell::Empty).count(), 6);
        assert!(g.is_wall(p(0, 2)));
        assert!(g.is_wall(p(4, 3)));
        assert!(!g.is_wall(p(1, 1)));
    }

    #[test]
    fn bordered_rejects_degenerate_sizes() {
        assert_eq!(Grid::bordered(0, 5), Err(GridError::EmptyGrid));
        assert_eq!(
            Grid::bordered(2, 5),
            Err(GridError::TooSmall {
                width: 2,
                height: 5
            })
        );
        assert!(matches!(
            Grid::bordered(Grid::MAX_DIM + 1, 5),
            Err(GridError::DimensionTooLarge { name: "width", .. })
        ));
    }

    #[test]
    fn from_rows_parses_symbols() {
        let g = Grid::from_rows(&["#####", "#.$.#", "#####"]).unwrap();
        assert_eq!(g.cell(p(2, 1)), Some(Cell::Item));
        assert_eq!(g.cell(p(1, 1)), Some(Cell::Empty));
        assert_eq!(g.item_count(), 1);
        assert_eq!(g.rows(), vec!["#####", "#.$.#", "#####"]);
    }

    #[test]
    fn from_rows_rejects_bad_maps() {
        let empty: [&str; 0] = [];
        assert_eq!(Grid::from_rows(&empty), Err(GridError::EmptyGrid));
        assert_eq!(
            Grid::from_rows(&["###", "##"]),
            Err(GridError::RaggedRows {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Grid::from_rows(&["#x#"]),
            Err(GridError::UnknownSymbol {
                symbol: 'x',
                x: 1,
                y: 0
            })
        );
    }

    #[test]
    fn items_only_toggle_floor() {
        let mut g = Grid::bordered(4, 4).unwrap();
        assert!(!g.place_item(p(0, 0)), "walls never become items");
        assert!(!g.place_item(p(9, 9)));
        assert!(g.place_item(p(1, 1)));
        assert!(!g.place_item(p(1, 1)), "already an item");
        assert_eq!(g.item_count(), 1);
        assert!(g.take_item(p(1, 1)));
        assert!(!g.take_item(p(1, 1)));
        assert_eq!(g.cell(p(1, 1)), Some(Cell::Empty));
    }

    #[test]
    fn out_of_bounds_blocks_but_is_not_a_wall() {
        let g = Grid::bordered(4, 4).unwrap();
        assert!(g.is_blocked(p(-1, 0)));
        assert!(!g.is_wall(p(-1, 0)));
        assert_eq!(g.cell(p(4, 0)), None);
    }

    #[test]
    fn wall_mask_matches_grid() {
        let mut g = Grid::from_rows(&["#####", "#.#.#", "#...#", "#####"]).unwrap();
        g.place_item(p(1, 1));
        let mask = g.wall_mask();
        for y in -1..5 {
            for x in -1..6 {
                assert_eq!(mask.is_blocked(p(x, y)), g.is_blocked(p(x, y)), "({x}, {y})");
            }
        }
    }

    #[test]
    fn center_of_even_grid() {
        let g = Grid::bordered(20, 20).unwrap();
        assert_eq!(g.center(), p(10, 10));
    }
}
