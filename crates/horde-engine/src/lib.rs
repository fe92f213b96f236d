//! Concurrent world and role threads for horde pursuit sessions.
//!
//! The [`World`] is the single authority over mutable game state. It
//! guards the grid, the player and the pursuer roster behind one world
//! lock, and the life counter behind a separate lives lock that is never
//! acquired while the world lock is held.
//!
//! A [`RealtimeSession`] runs the world against wall-clock time with one
//! thread per role: an orchestrator tick loop, a spawner feeding the
//! bounded [`SpawnQueue`], one pursuer loop per roster slot, and an input
//! poller. Rendering and keyboard capture stay with the host through the
//! [`FrameSink`] and [`InputSource`] seams.
//!
//! The world can also be driven directly, one call at a time, which is
//! how most of the tests exercise it:
//!
//! ```
//! use horde_engine::initialize;
//!
//! let world = initialize(20, 20, 3, 5).unwrap();
//! let result = world.tick();
//! assert!(result.running);
//! assert_eq!(world.lives(), 3);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod frame;
pub mod input;
pub mod metrics;
mod orchestrator;
mod pursuer;
pub mod semaphore;
pub mod session;
pub mod snapshot;
pub mod spawn_queue;
pub mod spawner;
pub mod stop;
pub mod world;

pub use config::{ConfigError, Layout, SessionConfig, WorldConfig};
pub use frame::{FrameSink, NullSink, SessionSummary};
pub use input::{InputEvent, InputSource, NoInput};
pub use metrics::WorldMetrics;
pub use semaphore::Semaphore;
pub use session::{RealtimeSession, ShutdownReport};
pub use snapshot::{PursuerView, RenderSnapshot, PLAYER_SYMBOL, PURSUER_SYMBOL};
pub use spawn_queue::{SpawnQueue, SpawnRequest};
pub use spawner::{choose_spawn_position, spawn_corners};
pub use stop::StopSignal;
pub use world::{initialize, TickResult, World, WorldHandle};
