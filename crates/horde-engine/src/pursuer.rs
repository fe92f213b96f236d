//! Pursuer role: one fixed-period loop per roster slot.

use std::time::Duration;

use tracing::debug;

use horde_core::{Phase, PursuerId, Rejection, StepOutcome};

use crate::stop::StopSignal;
use crate::world::WorldHandle;

pub(crate) struct PursuerRole {
    pub id: PursuerId,
    pub world: WorldHandle,
    pub stop: StopSignal,
    pub period: Duration,
}

impl PursuerRole {
    /// Advance this slot's pursuer once per period until stop or game
    /// over. Until the spawner fills the slot every advance is a no-op.
    pub fn run(self) {
        debug!(id = %self.id, period_ms = self.period.as_millis() as u64, "pursuer_started");
        let mut steps = 0u64;
        while self.stop.sleep(self.period) {
            match self.world.phase() {
                Phase::GameOver => break,
                Phase::Initializing => continue,
                Phase::Running => {}
            }
            match self.world.advance_pursuer(self.id) {
                StepOutcome::Moved { .. } => steps += 1,
                StepOutcome::Rejected(Rejection::NotRunning) => break,
                _ => {}
            }
        }
        debug!(id = %self.id, steps, "pursuer_stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::spawn_queue::SpawnRequest;
    use crate::world::World;
    use horde_core::{Direction, EndReason, Position};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn chases_until_game_over() {
        let world = World::new(&WorldConfig {
            width: 9,
            height: 9,
            player_start: Some(Position::new(4, 4)),
            ..WorldConfig::default()
        })
        .unwrap();
        world.begin();
        world.set_player_intent(Direction::None);
        assert!(world.try_reserve_spawn());
        world
            .spawn_queue()
            .try_push(SpawnRequest::new(Position::new(1, 1)))
            .unwrap();
        let id = world.drain_spawned_position().unwrap();
        let world = Arc::new(world);

        let role = PursuerRole {
            id,
            world: Arc::clone(&world),
            stop: StopSignal::new(),
            period: Duration::from_millis(2),
        };
        let handle = thread::spawn(move || role.run());

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while world.lives() == 3 {
            assert!(std::time::Instant::now() < deadline, "pursuer never arrived");
            thread::sleep(Duration::from_millis(5));
        }
        let at = world.pursuer_position(id).unwrap();
        assert!(at.is_adjacent(Position::new(4, 4)), "struck from {at}");

        world.end(EndReason::Shutdown);
        handle.join().unwrap();
    }

    #[test]
    fn empty_slot_waits_for_stop() {
        let world = World::new(&WorldConfig::default()).unwrap();
        world.begin();
        let stop = StopSignal::new();
        let role = PursuerRole {
            id: PursuerId(2),
            world: Arc::new(world),
            stop: stop.clone(),
            period: Duration::from_millis(1),
        };
        let handle = thread::spawn(move || role.run());
        thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());
        stop.request_stop();
        handle.join().unwrap();
    }
}
