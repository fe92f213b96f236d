//! Error types for grid construction.

use std::fmt;

/// Errors arising from grid construction or map parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A map with no rows or no columns.
    EmptyGrid,
    /// A bordered grid needs at least one interior cell.
    TooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A dimension exceeds [`Grid::MAX_DIM`](crate::Grid::MAX_DIM).
    DimensionTooLarge {
        /// Which dimension.
        name: &'static str,
        /// The requested value.
        value: u32,
        /// Maximum allowed value.
        max: u32,
    },
    /// An ASCII map row has a different length from the first row.
    RaggedRows {
        /// Zero-based row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        found: usize,
    },
    /// An ASCII map contains a symbol that is not a cell.
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::TooSmall { width, height } => {
                write!(f, "bordered grid {width}x{height} has no interior (minimum 3x3)")
            }
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum of {max}")
            }
            Self::RaggedRows {
                row,
                expected,
                found,
            } => {
                write!(f, "row {row} has {found} cells, expected {expected}")
            }
            Self::UnknownSymbol { symbol, x, y } => {
                write!(f, "unknown map symbol {symbol:?} at ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for GridError {}
