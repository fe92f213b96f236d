//! Breadth-first pursuit pathfinding.
//!
//! Pure functions over a [`Terrain`]. Every call builds its own visited
//! and parent tables, so concurrent callers never share search state.
//!
//! Neighbours are expanded in the fixed order up, down, left, right
//! ([`Direction::CARDINALS`](horde_core::Direction::CARDINALS)). With
//! first-discovery parents this makes the returned step the first
//! direction, in that order, that starts some shortest path.

use std::collections::VecDeque;

use horde_core::Position;

use crate::terrain::Terrain;

const NO_PARENT: usize = usize::MAX;

/// First step of a shortest path from `start` to `target`.
///
/// Only walls and out-of-bounds cells are obstacles. Returns `start`
/// unchanged when `start == target`, when either endpoint is out of
/// bounds, when `target` is a wall, or when no path exists.
///
/// # Examples
///
/// ```
/// use horde_core::Position;
/// use horde_grid::{next_step, Grid};
///
/// let grid = Grid::bordered(20, 20).unwrap();
/// let step = next_step(Position::new(1, 1), Position::new(10, 10), &grid);
/// // Down is explored before Right, so the tie breaks downwards.
/// assert_eq!(step, Position::new(1, 2));
/// ```
pub fn next_step<T: Terrain + ?Sized>(start: Position, target: Position, terrain: &T) -> Position {
    if start == target {
        return start;
    }
    let Some(search) = Search::run(start, target, terrain) else {
        return start;
    };

    let mut current = search.target;
    loop {
        let parent = search.parent[current];
        if parent == search.start {
            return terrain.position_of(current);
        }
        if parent == NO_PARENT {
            return start;
        }
        current = parent;
    }
}

/// Length of a shortest path from `start` to `target`, if one exists.
///
/// `Some(0)` when the endpoints coincide and are inside the grid.
pub fn distance<T: Terrain + ?Sized>(start: Position, target: Position, terrain: &T) -> Option<u32> {
    if start == target {
        return terrain.contains(start).then_some(0);
    }
    let search = Search::run(start, target, terrain)?;

    let mut steps = 0u32;
    let mut current = search.target;
    while current != search.start {
        current = search.parent[current];
        if current == NO_PARENT {
            return None;
        }
        steps += 1;
    }
    Some(steps)
}

/// A completed breadth-first search that reached its target.
struct Search {
    parent: Vec<usize>,
    start: usize,
    target: usize,
}

impl Search {
    /// Run a BFS from `start` until `target` is dequeued.
    ///
    /// Returns `None` if the target is unreachable or an endpoint is
    /// invalid.
    fn run<T: Terrain + ?Sized>(start: Position, target: Position, terrain: &T) -> Option<Self> {
        let start_idx = terrain.index_of(start)?;
        let target_idx = terrain.index_of(target)?;
        if terrain.is_blocked(target) {
            return None;
        }

        let cells = terrain.width() as usize * terrain.height() as usize;
        let mut visited = vec![false; cells];
        let mut parent = vec![NO_PARENT; cells];
        let mut queue = VecDeque::new();

        visited[start_idx] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == target {
                return Some(Self {
                    parent,
                    start: start_idx,
                    target: target_idx,
                });
            }
            let Some(current_idx) = terrain.index_of(current) else {
                continue;
            };
            for next in terrain.open_neighbours(current) {
                let Some(next_idx) = terrain.index_of(next) else {
                    continue;
                };
                if visited[next_idx] {
                    continue;
                }
                visited[next_idx] = true;
                parent[next_idx] = current_idx;
                queue.push_back(next);
            }
        }
        None
    }
}
