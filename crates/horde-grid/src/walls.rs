//! Immutable, cheaply cloneable obstacle view.

use std::sync::Arc;

use horde_core::Position;

use crate::terrain::Terrain;

/// Snapshot of a grid's walls.
///
/// Walls never change after a grid is built, so a mask taken once at
/// world setup stays exact for the whole session. Cloning shares the
/// underlying buffer.
#[derive(Debug, Clone)]
pub struct WallMask {
    width: u32,
    height: u32,
    blocked: Arc<[bool]>,
}

// Compile-time assertion: WallMask must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<WallMask>();
};

impl WallMask {
    /// Wrap a row-major wall buffer.
    ///
    /// # Panics
    ///
    /// Panics if `blocked.len() != width * height`.
    pub fn new(width: u32, height: u32, blocked: Arc<[bool]>) -> Self {
        assert_eq!(
            blocked.len(),
            width as usize * height as usize,
            "wall buffer does not match {width}x{height}"
        );
        Self {
            width,
            height,
            blocked,
        }
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }
}

impl Terrain for WallMask {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_blocked(&self, pos: Position) -> bool {
        match self.index_of(pos) {
            Some(i) => self.blocked[i],
            None => true,
        }
    }
}
