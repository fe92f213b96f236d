//! The shared world and its state manager.
//!
//! [`World`] is the only mutator of shared state. Every operation is
//! atomic with respect to the others through one coarse world lock; the
//! lives counter sits behind a second, finer lock.
//!
//! # Lock ordering
//!
//! The lives lock is never taken while the world lock is held. Each
//! world-lock section is a block that returns a plain "contact happened"
//! value, and damage is applied only after that block has ended:
//!
//! ```text
//! let (outcome, contact) = { let state = self.lock_state(); ... };
//! if contact { self.apply_damage(..) }   // world lock already released
//! ```
//!
//! # Pathfinding off-lock
//!
//! Walls never change after construction, so pursuers search an
//! immutable [`WallMask`] without holding any lock. The pursuer's origin
//! and the player's cell are read in one world-lock section and the
//! proposed step is re-validated at commit.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use horde_core::{
    Cell, DamageOutcome, Direction, EndReason, GameEvent, MoveOutcome, Phase, Position,
    PursuerId, Rejection, StepOutcome, TickId,
};
use horde_grid::{next_step, Grid, Terrain, WallMask};

use crate::config::{ConfigError, WorldConfig};
use crate::metrics::{MetricCounters, WorldMetrics};
use crate::snapshot::{PursuerView, RenderSnapshot};
use crate::spawn_queue::SpawnQueue;

/// Shared handle to a world, cloned into every role.
pub type WorldHandle = Arc<World>;

/// Build a running world with default settings for everything but the
/// grid size and the population and item parameters.
///
/// # Examples
///
/// ```
/// use horde_core::{Direction, Position};
/// use horde_engine::initialize;
///
/// let world = initialize(20, 20, 3, 5).unwrap();
/// assert!(world.is_running());
/// assert_eq!(world.player_position(), Position::new(10, 10));
/// assert_eq!(world.items_remaining(), 5);
///
/// world.set_player_intent(Direction::Up);
/// let result = world.tick();
/// assert_eq!(result.player, Position::new(10, 9));
/// ```
pub fn initialize(
    width: u32,
    height: u32,
    max_pursuers: usize,
    item_batch_size: usize,
) -> Result<WorldHandle, ConfigError> {
    let config = WorldConfig {
        width,
        height,
        max_pursuers,
        item_batch_size,
        ..WorldConfig::default()
    };
    let world = World::new(&config)?;
    world.begin();
    Ok(Arc::new(world))
}

/// Result of one orchestrator tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickResult {
    /// The tick that just ran.
    pub tick: TickId,
    /// Whether the world is still running after the tick.
    pub running: bool,
    /// Pursuer admitted from the spawn queue this tick, if any.
    pub spawned: Option<PursuerId>,
    /// What happened to the player's move along the current intent.
    pub player_move: MoveOutcome,
    /// Player cell after the tick.
    pub player: Position,
}

// ── Guarded state ──────────────────────────────────────────────────

#[derive(Debug)]
struct Pursuer {
    id: PursuerId,
    position: Position,
}

/// Everything behind the world lock.
#[derive(Debug)]
struct WorldState {
    grid: Grid,
    player: Position,
    intent: Direction,
    pursuers: Vec<Pursuer>,
    score: u64,
    items_remaining: usize,
    rng: ChaCha8Rng,
}

impl WorldState {
    fn pursuer_at(&self, pos: Position) -> Option<PursuerId> {
        self.pursuers
            .iter()
            .find(|p| p.position == pos)
            .map(|p| p.id)
    }

    /// Whether an entity may move onto `target`.
    fn check_target(&self, target: Position) -> Result<(), Rejection> {
        match self.grid.cell(target) {
            None => Err(Rejection::OutOfBounds),
            Some(Cell::Wall) => Err(Rejection::Wall),
            Some(_) if self.pursuer_at(target).is_some() => Err(Rejection::Occupied),
            Some(_) => Ok(()),
        }
    }

    /// Place up to `batch` items on empty cells free of entities.
    fn respawn_items(&mut self, batch: usize) -> usize {
        let free: Vec<Position> = self
            .grid
            .positions_of(Cell::Empty)
            .filter(|&p| p != self.player && self.pursuer_at(p).is_none())
            .collect();
        let count = batch.min(free.len());
        for i in rand::seq::index::sample(&mut self.rng, free.len(), count) {
            self.grid.place_item(free[i]);
        }
        self.items_remaining = count;
        count
    }
}

/// Behind the lives lock.
#[derive(Debug)]
struct LivesState {
    lives: u32,
    last_hit: Option<TickId>,
}

// ── World ──────────────────────────────────────────────────────────

/// Shared world state manager.
///
/// All methods take `&self`; share it between roles as a
/// [`WorldHandle`]. Rejected operations are silent no-ops reported as
/// outcome values, never errors.
#[derive(Debug)]
pub struct World {
    state: Mutex<WorldState>,
    lives: Mutex<LivesState>,
    walls: WallMask,
    spawn_queue: SpawnQueue,
    phase: AtomicU8,
    end_reason: OnceLock<EndReason>,
    tick: AtomicU64,
    /// Roster plus spawn requests in flight.
    population: AtomicUsize,
    max_pursuers: usize,
    item_batch_size: usize,
    item_reward: u64,
    seed: u64,
    events: (Sender<GameEvent>, Receiver<GameEvent>),
    metrics: MetricCounters,
}

// Compile-time assertion: World must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<World>();
};

impl World {
    /// Build a world in the `Initializing` phase.
    ///
    /// Items already on a [`Layout::Rows`](crate::Layout::Rows) map form
    /// the first batch; otherwise a fresh batch is placed.
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        let (grid, player) = config.build()?;
        let walls = grid.wall_mask();
        let items_remaining = grid.item_count();
        let metrics = MetricCounters::default();

        let mut state = WorldState {
            grid,
            player,
            intent: Direction::Right,
            pursuers: Vec::with_capacity(config.max_pursuers),
            score: 0,
            items_remaining,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        };
        if items_remaining == 0 {
            state.respawn_items(config.item_batch_size);
        }
        MetricCounters::bump(&metrics.item_batches);

        debug!(
            width = walls.width(),
            height = walls.height(),
            %player,
            items = state.items_remaining,
            "world_built"
        );

        Ok(Self {
            state: Mutex::new(state),
            lives: Mutex::new(LivesState {
                lives: config.starting_lives,
                last_hit: None,
            }),
            walls,
            spawn_queue: SpawnQueue::new(config.spawn_queue_capacity),
            phase: AtomicU8::new(Phase::Initializing as u8),
            end_reason: OnceLock::new(),
            tick: AtomicU64::new(0),
            population: AtomicUsize::new(0),
            max_pursuers: config.max_pursuers,
            item_batch_size: config.item_batch_size,
            item_reward: config.item_reward,
            seed: config.seed,
            events: crossbeam_channel::bounded(config.event_capacity),
            metrics,
        })
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Whether the world is in the `Running` phase.
    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// `Initializing -> Running`. Returns `false` if the world had
    /// already left `Initializing`.
    pub fn begin(&self) -> bool {
        let started = self
            .phase
            .compare_exchange(
                Phase::Initializing as u8,
                Phase::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if started {
            info!("world_running");
        }
        started
    }

    /// Transition to `GameOver`. The first caller's reason wins; later
    /// calls return `false` and change nothing.
    pub fn end(&self, reason: EndReason) -> bool {
        if self.end_reason.set(reason).is_err() {
            return false;
        }
        self.phase.store(Phase::GameOver as u8, Ordering::Release);
        info!(%reason, tick = %self.current_tick(), "game_over");
        self.emit(GameEvent::GameOver { reason });
        true
    }

    /// Why the game ended, once it has.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason.get().copied()
    }

    /// The most recent tick (`TickId(0)` before the first).
    pub fn current_tick(&self) -> TickId {
        TickId(self.tick.load(Ordering::Acquire))
    }

    // ── Orchestrator ───────────────────────────────────────────────

    /// Advance the tick counter, admit at most one queued spawn, and move
    /// the player one cell along the current intent.
    pub fn tick(&self) -> TickResult {
        let tick = TickId(self.tick.fetch_add(1, Ordering::AcqRel) + 1);
        MetricCounters::bump(&self.metrics.ticks);

        let (spawned, player_move) = if self.is_running() {
            let spawned = self.drain_spawned_position();
            (spawned, self.move_player(self.player_intent()))
        } else {
            (None, MoveOutcome::Rejected(Rejection::NotRunning))
        };

        TickResult {
            tick,
            running: self.is_running(),
            spawned,
            player_move,
            player: self.player_position(),
        }
    }

    /// Move the player one cell.
    ///
    /// Rejected when not running, for [`Direction::None`], off the grid,
    /// into a wall, or onto a pursuer. A committed move collects any item
    /// on the new cell and then checks for contact with the roster.
    pub fn move_player(&self, direction: Direction) -> MoveOutcome {
        if !self.is_running() {
            return MoveOutcome::Rejected(Rejection::NotRunning);
        }
        if direction == Direction::None {
            return MoveOutcome::Rejected(Rejection::Idle);
        }

        let (outcome, contact) = {
            let mut state = self.lock_state();
            let target = state.player.step(direction);
            match state.check_target(target) {
                Err(rejection) => (MoveOutcome::Rejected(rejection), None),
                Ok(()) => {
                    state.player = target;
                    self.collect_item(&mut state, target);
                    // Unreachable while `check_target` rejects occupied cells;
                    // mirrors the pursuer-side contact check.
                    (MoveOutcome::Moved(target), state.pursuer_at(target))
                }
            }
        };

        match outcome {
            MoveOutcome::Moved(_) => MetricCounters::bump(&self.metrics.player_moves),
            MoveOutcome::Rejected(_) => MetricCounters::bump(&self.metrics.player_rejections),
        }
        if let Some(by) = contact {
            self.apply_damage(Some(by));
        }
        outcome
    }

    /// Admit one queued spawn request as a new pursuer, if one is ready.
    ///
    /// Never blocks. The request is discarded (and its population
    /// reservation released) if the roster is full, the cell is a wall,
    /// or another pursuer holds the cell. A pursuer admitted onto the
    /// player's cell damages the player.
    pub fn drain_spawned_position(&self) -> Option<PursuerId> {
        let request = self.spawn_queue.try_pop()?;
        if !self.is_running() {
            self.release_spawn_reservation();
            return None;
        }

        let (admitted, contact) = {
            let mut state = self.lock_state();
            let full = state.pursuers.len() >= self.max_pursuers;
            if full || self.walls.is_blocked(request.at) || state.pursuer_at(request.at).is_some()
            {
                (None, false)
            } else {
                let id = PursuerId(state.pursuers.len() as u32);
                state.pursuers.push(Pursuer {
                    id,
                    position: request.at,
                });
                (Some(id), request.at == state.player)
            }
        };

        match admitted {
            Some(id) => {
                MetricCounters::bump(&self.metrics.spawns_drained);
                debug!(%id, at = %request.at, "pursuer_spawned");
                self.emit(GameEvent::PursuerSpawned { id, at: request.at });
                if contact {
                    self.apply_damage(Some(id));
                }
            }
            None => {
                MetricCounters::bump(&self.metrics.spawns_discarded);
                self.release_spawn_reservation();
                debug!(at = %request.at, "spawn_discarded");
            }
        }
        admitted
    }

    // ── Pursuers ───────────────────────────────────────────────────

    /// Move pursuer `id` one step along a shortest path to the player.
    ///
    /// The origin and target are read in one lock section, the path is
    /// searched without the lock, and the step is validated against the
    /// state current at commit. A step onto the player's cell is a strike:
    /// the pursuer holds its cell and the player takes damage. Rejected
    /// steps are dropped, not retried.
    pub fn advance_pursuer(&self, id: PursuerId) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Rejected(Rejection::NotRunning);
        }

        let (from, target) = {
            let state = self.lock_state();
            match state.pursuers.get(id.index()) {
                Some(p) => (p.position, state.player),
                None => return StepOutcome::Rejected(Rejection::UnknownPursuer),
            }
        };

        let step = next_step(from, target, &self.walls);
        if step == from {
            return StepOutcome::Held { at: from };
        }

        let (outcome, struck) = {
            let mut state = self.lock_state();
            if !self.is_running() {
                (StepOutcome::Rejected(Rejection::NotRunning), false)
            } else if state.pursuers[id.index()].position != from {
                (StepOutcome::Rejected(Rejection::Stale), false)
            } else if step == state.player {
                (StepOutcome::Struck { at: from }, true)
            } else {
                match state.check_target(step) {
                    Err(rejection) => (StepOutcome::Rejected(rejection), false),
                    Ok(()) => {
                        state.pursuers[id.index()].position = step;
                        (StepOutcome::Moved { from, to: step }, false)
                    }
                }
            }
        };

        match outcome {
            StepOutcome::Moved { .. } => MetricCounters::bump(&self.metrics.pursuer_steps),
            StepOutcome::Struck { .. } => MetricCounters::bump(&self.metrics.pursuer_strikes),
            StepOutcome::Rejected(_) => MetricCounters::bump(&self.metrics.pursuer_rejections),
            StepOutcome::Held { .. } => {}
        }
        trace!(%id, ?outcome, "pursuer_advanced");
        if struck {
            self.apply_damage(Some(id));
        }
        outcome
    }

    // ── Lives ──────────────────────────────────────────────────────

    /// Remove one life, at most once per tick.
    ///
    /// Safe to call from both player- and pursuer-initiated contact in
    /// the same tick: only the first call in a tick takes a life. At zero
    /// lives the world ends with [`EndReason::LivesExhausted`].
    ///
    /// Must not be called while holding the world lock.
    pub fn apply_damage(&self, by: Option<PursuerId>) -> DamageOutcome {
        if !self.is_running() {
            return DamageOutcome::NotRunning;
        }
        let tick = self.current_tick();
        let lives_left = {
            let mut lives = self.lock_lives();
            if lives.lives == 0 {
                return DamageOutcome::NotRunning;
            }
            if lives.last_hit == Some(tick) {
                return DamageOutcome::AlreadyHit;
            }
            lives.lives -= 1;
            lives.last_hit = Some(tick);
            lives.lives
        };

        MetricCounters::bump(&self.metrics.hits);
        info!(by = ?by.map(|id| id.0), lives_left, %tick, "player_hit");
        self.emit(GameEvent::PlayerHit { by, lives_left });
        if lives_left == 0 {
            self.end(EndReason::LivesExhausted);
        }
        DamageOutcome::Hit { lives_left }
    }

    /// Lives left.
    pub fn lives(&self) -> u32 {
        self.lock_lives().lives
    }

    // ── Spawn population ───────────────────────────────────────────

    /// Reserve room for one more pursuer. Fails once roster plus
    /// in-flight requests reach `max_pursuers`.
    pub fn try_reserve_spawn(&self) -> bool {
        self.population
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_pursuers).then_some(n + 1)
            })
            .is_ok()
    }

    /// Return a reservation whose request never became a pursuer.
    pub fn release_spawn_reservation(&self) {
        let _ = self
            .population
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Roster size plus reserved in-flight spawns.
    pub fn population(&self) -> usize {
        self.population.load(Ordering::Acquire)
    }

    /// Configured population cap.
    pub fn max_pursuers(&self) -> usize {
        self.max_pursuers
    }

    /// The bounded spawn buffer between spawner and orchestrator.
    pub fn spawn_queue(&self) -> &SpawnQueue {
        &self.spawn_queue
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Set the player's facing; the orchestrator moves along it each tick.
    pub fn set_player_intent(&self, direction: Direction) {
        self.lock_state().intent = direction;
    }

    /// Current facing.
    pub fn player_intent(&self) -> Direction {
        self.lock_state().intent
    }

    /// Current player cell.
    pub fn player_position(&self) -> Position {
        self.lock_state().player
    }

    /// Cells held by pursuers, in roster order.
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.lock_state()
            .pursuers
            .iter()
            .map(|p| p.position)
            .collect()
    }

    /// Cell of pursuer `id`, if admitted.
    pub fn pursuer_position(&self, id: PursuerId) -> Option<Position> {
        self.lock_state()
            .pursuers
            .get(id.index())
            .map(|p| p.position)
    }

    /// Number of admitted pursuers.
    pub fn pursuer_count(&self) -> usize {
        self.lock_state().pursuers.len()
    }

    /// Current score.
    pub fn score(&self) -> u64 {
        self.lock_state().score
    }

    /// Uncollected items in the current batch.
    pub fn items_remaining(&self) -> usize {
        self.lock_state().items_remaining
    }

    /// Immutable wall view shared with pursuer searches.
    pub fn walls(&self) -> &WallMask {
        &self.walls
    }

    /// Configured RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Owned copy of everything a renderer draws.
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let mut snapshot = {
            let state = self.lock_state();
            RenderSnapshot {
                tick: self.current_tick(),
                grid: state.grid.clone(),
                player: state.player,
                facing: state.intent,
                pursuers: state
                    .pursuers
                    .iter()
                    .map(|p| PursuerView {
                        id: p.id,
                        position: p.position,
                    })
                    .collect(),
                score: state.score,
                lives: 0,
                items_remaining: state.items_remaining,
                phase: self.phase(),
                end_reason: self.end_reason(),
            }
        };
        snapshot.lives = self.lives();
        snapshot
    }

    /// Receiver for gameplay events. Every clone competes for the same
    /// events. When the channel is full the oldest event is dropped, so a
    /// late subscriber sees the most recent `event_capacity` events.
    pub fn events(&self) -> Receiver<GameEvent> {
        self.events.1.clone()
    }

    /// Counter snapshot.
    pub fn metrics(&self) -> WorldMetrics {
        self.metrics.snapshot()
    }

    // ── Internals ──────────────────────────────────────────────────

    fn collect_item(&self, state: &mut WorldState, at: Position) {
        if !state.grid.take_item(at) {
            return;
        }
        state.score += self.item_reward;
        state.items_remaining = state.items_remaining.saturating_sub(1);
        MetricCounters::bump(&self.metrics.items_collected);
        self.emit(GameEvent::ItemCollected {
            at,
            score: state.score,
        });

        if state.items_remaining == 0 {
            let count = state.respawn_items(self.item_batch_size);
            MetricCounters::bump(&self.metrics.item_batches);
            debug!(count, "items_respawned");
            self.emit(GameEvent::ItemsRespawned { count });
        }
    }

    fn emit(&self, event: GameEvent) {
        let (tx, rx) = &self.events;
        // Full: drop the oldest and retry once.
        if let Err(TrySendError::Full(event)) = tx.try_send(event) {
            let _ = rx.try_recv();
            let _ = tx.try_send(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_lives(&self) -> MutexGuard<'_, LivesState> {
        self.lives.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
