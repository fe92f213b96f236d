//! Owned, read-only copies of world state for renderers.

use std::fmt;

use horde_core::{Direction, EndReason, Phase, Position, PursuerId, TickId};
use horde_grid::{Grid, Terrain};

/// Symbol drawn for the player.
pub const PLAYER_SYMBOL: char = 'P';
/// Symbol drawn for a pursuer.
pub const PURSUER_SYMBOL: char = 'Z';

/// One pursuer as seen by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerView {
    /// Roster id.
    pub id: PursuerId,
    /// Current cell.
    pub position: Position,
}

/// Everything an external renderer needs for one frame.
///
/// Produced by [`World::render_snapshot`](crate::World::render_snapshot)
/// as an owned copy; nothing borrows from the live world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Tick the snapshot was taken after.
    pub tick: TickId,
    /// Walls, floor and items.
    pub grid: Grid,
    /// Player cell.
    pub player: Position,
    /// Player facing (current movement intent).
    pub facing: Direction,
    /// Pursuers in roster order.
    pub pursuers: Vec<PursuerView>,
    /// Current score.
    pub score: u64,
    /// Lives left.
    pub lives: u32,
    /// Uncollected items in the current batch.
    pub items_remaining: usize,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Why the game ended, once it has.
    pub end_reason: Option<EndReason>,
}

impl RenderSnapshot {
    /// Whether the world was running when the snapshot was taken.
    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Symbol for one cell. The player is drawn over pursuers, pursuers
    /// over the grid. Out-of-bounds cells render as a space.
    pub fn symbol_at(&self, pos: Position) -> char {
        if pos == self.player {
            return PLAYER_SYMBOL;
        }
        if self.pursuers.iter().any(|p| p.position == pos) {
            return PURSUER_SYMBOL;
        }
        self.grid.cell(pos).map_or(' ', |c| c.symbol())
    }

    /// One string per grid row.
    pub fn rows(&self) -> Vec<String> {
        (0..self.grid.height() as i32)
            .map(|y| {
                (0..self.grid.width() as i32)
                    .map(|x| self.symbol_at(Position::new(x, y)))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for RenderSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SCORE: {} | LIVES: {} | PURSUERS: {}",
            self.score,
            self.lives,
            self.pursuers.len()
        )?;
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RenderSnapshot {
        let mut grid = Grid::bordered(5, 4).unwrap();
        grid.place_item(Position::new(3, 2));
        RenderSnapshot {
            tick: TickId(7),
            grid,
            player: Position::new(1, 1),
            facing: Direction::Right,
            pursuers: vec![PursuerView {
                id: PursuerId(0),
                position: Position::new(3, 1),
            }],
            score: 20,
            lives: 2,
            items_remaining: 1,
            phase: Phase::Running,
            end_reason: None,
        }
    }

    #[test]
    fn display_draws_header_and_symbols() {
        let text = snapshot().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "SCORE: 20 | LIVES: 2 | PURSUERS: 1");
        assert_eq!(&lines[1..], ["#####", "#P.Z#", "#..$#", "#####"]);
    }

    #[test]
    fn player_drawn_over_pursuer() {
        let mut snap = snapshot();
        snap.pursuers[0].position = snap.player;
        assert_eq!(snap.symbol_at(snap.player), PLAYER_SYMBOL);
        assert_eq!(snap.symbol_at(Position::new(-1, 0)), ' ');
        assert!(snap.running());
    }
}
