//! Bounded producer-consumer buffer of pending pursuer spawns.
//!
//! The classic two-semaphore bounded buffer: `slots` counts free space,
//! `items` counts ready entries, and a short mutex guards the FIFO
//! itself. The producer blocks on `slots` when the buffer is full; the
//! consumer never blocks.
//!
//! ```text
//!  producer                          consumer (orchestrator tick)
//!     | slots.wait()                    | items.try_wait()  -> None if empty
//!     | lock; push_back; unlock         | lock; pop_front; unlock
//!     | items.signal()                  | slots.signal()
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use horde_core::Position;

use crate::semaphore::Semaphore;
use crate::stop::StopSignal;

/// Where a new pursuer should appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Spawn cell chosen by the producer.
    pub at: Position,
}

impl SpawnRequest {
    /// Request a spawn at `at`.
    pub fn new(at: Position) -> Self {
        Self { at }
    }
}

/// Fixed-capacity FIFO of [`SpawnRequest`]s.
///
/// # Invariant
///
/// `0 <= outstanding() <= capacity()` at every instant. Both counters
/// move under the buffer lock together with the buffer itself, so
/// `produced - consumed` read under that lock is the buffered length.
#[derive(Debug)]
pub struct SpawnQueue {
    buffer: Mutex<VecDeque<SpawnRequest>>,
    slots: Semaphore,
    items: Semaphore,
    produced: AtomicU64,
    consumed: AtomicU64,
}

// Compile-time assertion: SpawnQueue must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SpawnQueue>();
};

impl SpawnQueue {
    /// Default number of in-flight spawn requests.
    pub const DEFAULT_CAPACITY: usize = 3;

    /// Create an empty queue.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            slots: Semaphore::new(capacity, capacity),
            items: Semaphore::new(0, capacity),
            produced: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
        }
    }

    /// Append a request, blocking while the queue is full.
    pub fn push(&self, request: SpawnRequest) {
        self.slots.wait();
        self.enqueue(request);
    }

    /// Append a request, blocking while the queue is full unless `stop`
    /// is requested.
    ///
    /// The stop flag is checked again after a slot is acquired; if stop
    /// won the race the slot is returned untouched. On stop the request
    /// is handed back.
    pub fn push_or_stop(
        &self,
        request: SpawnRequest,
        stop: &StopSignal,
    ) -> Result<(), SpawnRequest> {
        if !self.slots.wait_or_stop(stop) {
            return Err(request);
        }
        if stop.is_stopped() {
            self.slots.signal();
            return Err(request);
        }
        self.enqueue(request);
        Ok(())
    }

    /// Append a request only if a slot is free right now.
    pub fn try_push(&self, request: SpawnRequest) -> Result<(), SpawnRequest> {
        if !self.slots.try_wait() {
            return Err(request);
        }
        self.enqueue(request);
        Ok(())
    }

    /// Pop the oldest request, or `None` immediately if nothing is ready.
    pub fn try_pop(&self) -> Option<SpawnRequest> {
        if !self.items.try_wait() {
            return None;
        }
        let request = {
            let mut buffer = self.lock();
            let request = buffer.pop_front();
            self.consumed.fetch_add(1, Ordering::AcqRel);
            request
        };
        debug_assert!(request.is_some(), "items permit without a buffered request");
        self.slots.signal();
        request
    }

    /// Maximum number of outstanding requests.
    pub fn capacity(&self) -> usize {
        self.slots.max()
    }

    /// Requests currently buffered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no request is buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Free slots (permits available to the producer).
    pub fn free_slots(&self) -> usize {
        self.slots.available()
    }

    /// Total requests ever appended.
    pub fn produced(&self) -> u64 {
        self.produced.load(Ordering::Acquire)
    }

    /// Total requests ever popped.
    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Acquire)
    }

    /// `produced - consumed`, both read under the buffer lock.
    pub fn outstanding(&self) -> u64 {
        let _buffer = self.lock();
        self.produced().saturating_sub(self.consumed())
    }

    fn enqueue(&self, request: SpawnRequest) {
        {
            let mut buffer = self.lock();
            buffer.push_back(request);
            self.produced.fetch_add(1, Ordering::AcqRel);
        }
        self.items.signal();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<SpawnRequest>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SpawnQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
