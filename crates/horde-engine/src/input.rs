//! Player input role.
//!
//! Raw keyboard capture is left to the host. The host hands the session
//! an [`InputSource`], usually the receiving end of a channel it feeds
//! from its own event loop.

use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use horde_core::{Direction, EndReason, Phase};

use crate::stop::StopSignal;
use crate::world::WorldHandle;

/// One decoded player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Change the player's facing.
    Steer(Direction),
    /// End the session.
    Quit,
}

/// Non-blocking source of player input.
pub trait InputSource: Send {
    /// Next pending event, or `None` if nothing is ready right now.
    fn poll(&mut self) -> Option<InputEvent>;
}

impl InputSource for Receiver<InputEvent> {
    fn poll(&mut self) -> Option<InputEvent> {
        self.try_recv().ok()
    }
}

impl InputSource for Box<dyn InputSource> {
    fn poll(&mut self) -> Option<InputEvent> {
        (**self).poll()
    }
}

/// A source that never produces input.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> Option<InputEvent> {
        None
    }
}

pub(crate) struct InputRole<I> {
    pub world: WorldHandle,
    pub stop: StopSignal,
    pub source: I,
    pub poll_interval: Duration,
}

impl<I: InputSource> InputRole<I> {
    /// Poll until stop, game over, or quit. Pending events are drained
    /// back to back; the poll interval only applies when idle.
    pub fn run(mut self) {
        debug!("input_started");
        while !self.stop.is_stopped() && self.world.phase() != Phase::GameOver {
            match self.source.poll() {
                Some(InputEvent::Steer(direction)) => self.world.set_player_intent(direction),
                Some(InputEvent::Quit) => {
                    info!("quit_requested");
                    self.world.end(EndReason::Quit);
                    break;
                }
                None => {
                    if !self.stop.sleep(self.poll_interval) {
                        break;
                    }
                }
            }
        }
        debug!("input_stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::world::World;
    use std::sync::Arc;

    fn running_world() -> WorldHandle {
        let world = World::new(&WorldConfig::default()).unwrap();
        world.begin();
        Arc::new(world)
    }

    #[test]
    fn channel_source_polls_without_blocking() {
        let (tx, mut rx) = crossbeam_channel::unbounded::<InputEvent>();
        assert_eq!(rx.poll(), None);
        tx.send(InputEvent::Quit).unwrap();
        assert_eq!(rx.poll(), Some(InputEvent::Quit));
        assert_eq!(NoInput.poll(), None);
    }

    #[test]
    fn steer_then_quit() {
        let world = running_world();
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(InputEvent::Steer(Direction::Up)).unwrap();
        tx.send(InputEvent::Steer(Direction::Left)).unwrap();
        tx.send(InputEvent::Quit).unwrap();
        InputRole {
            world: Arc::clone(&world),
            stop: StopSignal::new(),
            source: rx,
            poll_interval: Duration::from_millis(1),
        }
        .run();
        assert_eq!(world.player_intent(), Direction::Left);
        assert_eq!(world.end_reason(), Some(EndReason::Quit));
    }

    #[test]
    fn stops_on_request_while_idle() {
        let world = running_world();
        let stop = StopSignal::new();
        stop.request_stop();
        InputRole {
            world: Arc::clone(&world),
            stop,
            source: NoInput,
            poll_interval: Duration::from_secs(60),
        }
        .run();
        assert!(world.is_running());
    }
}
