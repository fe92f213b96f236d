//! World and session configuration, validation, and error types.
//!
//! [`WorldConfig`] describes the shared world (grid, population caps,
//! item economy). [`SessionConfig`] wraps it with the timing that drives
//! the realtime roles. Both are plain data with `Default` values
//! matching the classic game, and a `validate()` pass that checks every
//! structural invariant before any thread is started.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use horde_core::Position;
use horde_grid::{Grid, GridError, Terrain};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating configuration or starting a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The grid layout could not be built.
    Grid(GridError),
    /// `max_pursuers` is zero.
    NoPursuers,
    /// `item_batch_size` is zero.
    ZeroItemBatch,
    /// `starting_lives` is zero.
    ZeroLives,
    /// `spawn_queue_capacity` is zero.
    ZeroSpawnQueue,
    /// `pursuer_speed_ratio` is NaN, infinite, zero, or negative.
    InvalidSpeedRatio {
        /// The invalid value.
        value: f64,
    },
    /// `tick_period` is zero.
    ZeroTickPeriod,
    /// `spawn_interval` is zero.
    ZeroSpawnInterval,
    /// The player start cell is outside the grid or a wall.
    InvalidPlayerStart {
        /// The rejected cell.
        at: Position,
    },
    /// A role thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::NoPursuers => write!(f, "max_pursuers must be at least 1"),
            Self::ZeroItemBatch => write!(f, "item_batch_size must be at least 1"),
            Self::ZeroLives => write!(f, "starting_lives must be at least 1"),
            Self::ZeroSpawnQueue => write!(f, "spawn_queue_capacity must be at least 1"),
            Self::InvalidSpeedRatio { value } => {
                write!(
                    f,
                    "pursuer_speed_ratio must be finite and positive, got {value}"
                )
            }
            Self::ZeroTickPeriod => write!(f, "tick_period must be non-zero"),
            Self::ZeroSpawnInterval => write!(f, "spawn_interval must be non-zero"),
            Self::InvalidPlayerStart { at } => {
                write!(f, "player start {at} is out of bounds or a wall")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── Layout ─────────────────────────────────────────────────────────

/// How the world grid is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Empty interior surrounded by a one-cell wall border, sized by
    /// [`WorldConfig::width`] and [`WorldConfig::height`].
    #[default]
    Bordered,
    /// ASCII map (`#` wall, `.` empty, `$` item). Dimensions come from
    /// the map; `width`/`height` are ignored.
    Rows(Vec<String>),
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Configuration for the shared world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Grid columns for [`Layout::Bordered`]. Default: 20.
    pub width: u32,
    /// Grid rows for [`Layout::Bordered`]. Default: 20.
    pub height: u32,
    /// Grid construction strategy. Default: [`Layout::Bordered`].
    pub layout: Layout,
    /// Maximum concurrent pursuers (roster plus in-flight spawns). Default: 3.
    pub max_pursuers: usize,
    /// Items placed per batch. Default: 5.
    pub item_batch_size: usize,
    /// Score awarded per item. Default: 10.
    pub item_reward: u64,
    /// Lives at session start. Default: 3.
    pub starting_lives: u32,
    /// Spawn queue capacity. Default: 3.
    pub spawn_queue_capacity: usize,
    /// Player start cell. `None` = grid centre.
    pub player_start: Option<Position>,
    /// Seed for the item placement and spawner RNGs.
    pub seed: u64,
    /// Capacity of the gameplay event channel; when full the oldest event
    /// is dropped. Default: 256.
    pub event_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            layout: Layout::Bordered,
            max_pursuers: 3,
            item_batch_size: 5,
            item_reward: 10,
            starting_lives: 3,
            spawn_queue_capacity: 3,
            player_start: None,
            seed: 0,
            event_capacity: 256,
        }
    }
}

impl WorldConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build().map(|_| ())
    }

    /// Validate and produce the initial grid and player start cell.
    pub(crate) fn build(&self) -> Result<(Grid, Position), ConfigError> {
        // 1. Population and economy must be non-degenerate.
        if self.max_pursuers == 0 {
            return Err(ConfigError::NoPursuers);
        }
        if self.item_batch_size == 0 {
            return Err(ConfigError::ZeroItemBatch);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        if self.spawn_queue_capacity == 0 {
            return Err(ConfigError::ZeroSpawnQueue);
        }
        // 2. The grid must build.
        let grid = match &self.layout {
            Layout::Bordered => Grid::bordered(self.width, self.height)?,
            Layout::Rows(rows) => Grid::from_rows(rows)?,
        };
        // 3. The player must start on a walkable cell.
        let start = self.player_start.unwrap_or_else(|| grid.center());
        if grid.is_blocked(start) {
            return Err(ConfigError::InvalidPlayerStart { at: start });
        }
        Ok((grid, start))
    }
}

// ── SessionConfig ──────────────────────────────────────────────────

/// Configuration for a [`RealtimeSession`](crate::session::RealtimeSession).
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// The world to run.
    pub world: WorldConfig,
    /// Orchestrator (player) tick period. Default: 500 ms.
    pub tick_period: Duration,
    /// Pursuer speed relative to the player; pursuers tick every
    /// `tick_period / pursuer_speed_ratio`. Default: 0.9.
    pub pursuer_speed_ratio: f64,
    /// Spawner cycle period. Default: 6 s.
    pub spawn_interval: Duration,
    /// Wall-clock session length. `None` = until the game ends otherwise.
    /// Default: 60 s.
    pub session_duration: Option<Duration>,
    /// Sleep between input polls when no input is pending. Default: 10 ms.
    pub input_poll_interval: Duration,
    /// Per-shutdown budget for joining role threads. Default: 1 s.
    pub join_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            tick_period: Duration::from_millis(500),
            pursuer_speed_ratio: 0.9,
            spawn_interval: Duration::from_secs(6),
            session_duration: Some(Duration::from_secs(60)),
            input_poll_interval: Duration::from_millis(10),
            join_timeout: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    /// Validate the world and the timing parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.validate_timing()
    }

    /// Sleep period of each pursuer role, `tick_period / pursuer_speed_ratio`.
    pub fn pursuer_period(&self) -> Result<Duration, ConfigError> {
        let ratio = self.pursuer_speed_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::InvalidSpeedRatio { value: ratio });
        }
        Duration::try_from_secs_f64(self.tick_period.as_secs_f64() / ratio)
            .map_err(|_| ConfigError::InvalidSpeedRatio { value: ratio })
    }

    pub(crate) fn validate_timing(&self) -> Result<(), ConfigError> {
        if self.tick_period.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        // The period must fit in a `Duration`.
        self.pursuer_period()?;
        if self.spawn_interval.is_zero() {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        Ok(())
    }
}
