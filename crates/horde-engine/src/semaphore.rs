//! Counting semaphore on a bounded crossbeam channel.
//!
//! Each permit is a `()` token sitting in a channel of capacity `max`.
//! Waiting receives a token, signalling sends one back. Because the
//! semaphore owns both ends, the channel can never disconnect.

use crossbeam_channel::{select, Receiver, Sender};

use crate::stop::StopSignal;

/// A counting semaphore with a fixed maximum.
#[derive(Debug)]
pub struct Semaphore {
    tokens: Receiver<()>,
    refill: Sender<()>,
    max: usize,
}

impl Semaphore {
    /// Create a semaphore holding `initial` of at most `max` permits.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero or `initial > max`.
    pub fn new(initial: usize, max: usize) -> Self {
        assert!(max > 0, "semaphore maximum must be at least 1");
        assert!(initial <= max, "initial permits {initial} exceed maximum {max}");
        let (refill, tokens) = crossbeam_channel::bounded(max);
        for _ in 0..initial {
            // Capacity is `max >= initial`, so this cannot fail.
            let _ = refill.try_send(());
        }
        Self {
            tokens,
            refill,
            max,
        }
    }

    /// Block until a permit is available, then take it.
    pub fn wait(&self) {
        // `self` owns a sender, so `recv` only returns once a token arrives.
        let _ = self.tokens.recv();
    }

    /// Block until a permit is available or `stop` is requested.
    ///
    /// Returns `true` if a permit was taken.
    pub fn wait_or_stop(&self, stop: &StopSignal) -> bool {
        if stop.is_stopped() {
            return false;
        }
        select! {
            recv(self.tokens) -> token => token.is_ok(),
            recv(stop.wake_channel()) -> _ => false,
        }
    }

    /// Take a permit if one is available, without blocking.
    pub fn try_wait(&self) -> bool {
        self.tokens.try_recv().is_ok()
    }

    /// Return a permit. Never blocks.
    pub fn signal(&self) {
        let returned = self.refill.try_send(()).is_ok();
        debug_assert!(returned, "semaphore signalled beyond its maximum");
    }

    /// Permits currently available.
    pub fn available(&self) -> usize {
        self.tokens.len()
    }

    /// Maximum number of permits.
    pub fn max(&self) -> usize {
        self.max
    }
}
