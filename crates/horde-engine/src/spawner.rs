//! Spawner (producer) role.
//!
//! Each cycle the spawner reserves population room, picks a free corner
//! and pushes the request through the bounded [`SpawnQueue`]. The push
//! is the only intentionally blocking wait in the simulation; it wakes
//! on stop.
//!
//! [`SpawnQueue`]: crate::SpawnQueue

use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use horde_core::{Phase, Position};
use horde_grid::Terrain;

use crate::spawn_queue::SpawnRequest;
use crate::stop::StopSignal;
use crate::world::WorldHandle;

/// The four interior corners of a bordered `width x height` grid:
/// top-left, top-right, bottom-left, bottom-right.
pub fn spawn_corners(width: u32, height: u32) -> [Position; 4] {
    let right = width as i32 - 2;
    let bottom = height as i32 - 2;
    [
        Position::new(1, 1),
        Position::new(right, 1),
        Position::new(1, bottom),
        Position::new(right, bottom),
    ]
}

/// Pick a spawn corner uniformly among those that are walkable, not the
/// player's cell and not held by a pursuer.
pub fn choose_spawn_position<T, R>(
    terrain: &T,
    player: Position,
    occupied: &[Position],
    rng: &mut R,
) -> Option<Position>
where
    T: Terrain + ?Sized,
    R: Rng + ?Sized,
{
    let mut candidates: Vec<Position> = spawn_corners(terrain.width(), terrain.height())
        .into_iter()
        .filter(|&c| !terrain.is_blocked(c) && c != player && !occupied.contains(&c))
        .collect();
    // Degenerate grids repeat corners.
    candidates.sort();
    candidates.dedup();
    candidates.choose(rng).copied()
}

/// What one spawner cycle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SpawnCycle {
    /// A request entered the queue.
    Produced(Position),
    /// Population is at its cap.
    AtCapacity,
    /// Every corner is blocked, taken, or under the player.
    NoFreeCorner,
    /// Stop arrived while waiting for a queue slot.
    Stopped,
}

pub(crate) struct Spawner {
    pub world: WorldHandle,
    pub stop: StopSignal,
    pub interval: Duration,
    pub rng: ChaCha8Rng,
}

impl Spawner {
    pub fn run(mut self) {
        debug!(interval_ms = self.interval.as_millis() as u64, "spawner_started");
        while self.stop.sleep(self.interval) {
            match self.world.phase() {
                Phase::GameOver => break,
                Phase::Initializing => continue,
                Phase::Running => {}
            }
            if self.cycle() == SpawnCycle::Stopped {
                break;
            }
        }
        debug!("spawner_stopped");
    }

    pub fn cycle(&mut self) -> SpawnCycle {
        if !self.world.try_reserve_spawn() {
            trace!("spawn_skipped_at_capacity");
            return SpawnCycle::AtCapacity;
        }

        let player = self.world.player_position();
        let occupied = self.world.occupied_positions();
        let Some(at) = choose_spawn_position(self.world.walls(), player, &occupied, &mut self.rng)
        else {
            self.world.release_spawn_reservation();
            trace!(%player, "spawn_skipped_no_corner");
            return SpawnCycle::NoFreeCorner;
        };

        match self
            .world
            .spawn_queue()
            .push_or_stop(SpawnRequest::new(at), &self.stop)
        {
            Ok(()) => {
                debug!(%at, "spawn_requested");
                SpawnCycle::Produced(at)
            }
            Err(_) => {
                self.world.release_spawn_reservation();
                SpawnCycle::Stopped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::world::World;
    use horde_grid::Grid;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn corners_of_default_grid() {
        assert_eq!(
            spawn_corners(20, 20),
            [p(1, 1), p(18, 1), p(1, 18), p(18, 18)]
        );
    }

    #[test]
    fn excludes_player_and_occupied_corners() {
        let grid = Grid::bordered(20, 20).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let at = choose_spawn_position(&grid, p(1, 1), &[p(18, 1), p(1, 18)], &mut rng);
            assert_eq!(at, Some(p(18, 18)));
        }
        let all = [p(18, 1), p(1, 18), p(18, 18)];
        assert_eq!(choose_spawn_position(&grid, p(1, 1), &all, &mut rng), None);
    }

    #[test]
    fn skips_walled_corners() {
        let grid = Grid::from_rows(&["#####", "##..#", "#...#", "#####"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut seen = Vec::new();
        for _ in 0..100 {
            let at = choose_spawn_position(&grid, p(2, 2), &[], &mut rng).unwrap();
            assert_ne!(at, p(1, 1), "(1,1) is a wall");
            if !seen.contains(&at) {
                seen.push(at);
            }
        }
        seen.sort();
        assert_eq!(seen, vec![p(1, 2), p(3, 1), p(3, 2)]);
    }

    #[test]
    fn cycle_respects_population_cap() {
        let world = World::new(&WorldConfig {
            max_pursuers: 1,
            ..WorldConfig::default()
        })
        .unwrap();
        world.begin();
        let mut spawner = Spawner {
            world: Arc::new(world),
            stop: StopSignal::new(),
            interval: Duration::from_secs(6),
            rng: ChaCha8Rng::seed_from_u64(3),
        };
        assert!(matches!(spawner.cycle(), SpawnCycle::Produced(_)));
        assert_eq!(spawner.cycle(), SpawnCycle::AtCapacity);
        assert_eq!(spawner.world.spawn_queue().outstanding(), 1);
        assert!(spawner.world.drain_spawned_position().is_some());
        assert_eq!(spawner.cycle(), SpawnCycle::AtCapacity);
    }

    #[test]
    fn cycle_releases_reservation_on_stop() {
        let world = World::new(&WorldConfig {
            max_pursuers: 3,
            spawn_queue_capacity: 1,
            ..WorldConfig::default()
        })
        .unwrap();
        world.begin();
        let stop = StopSignal::new();
        let mut spawner = Spawner {
            world: Arc::new(world),
            stop: stop.clone(),
            interval: Duration::from_secs(6),
            rng: ChaCha8Rng::seed_from_u64(3),
        };
        assert!(matches!(spawner.cycle(), SpawnCycle::Produced(_)));
        stop.request_stop();
        assert_eq!(spawner.cycle(), SpawnCycle::Stopped);
        assert_eq!(spawner.world.population(), 1);
    }
}
