//! Cooperative stop request shared by every role thread.
//!
//! A [`StopSignal`] combines an atomic flag (cheap polling) with a
//! crossbeam channel that is disconnected when stop is requested. Any
//! thread blocked in [`StopSignal::sleep`] or selecting on the channel
//! wakes immediately, regardless of how long it meant to wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Clonable handle to one shared stop request.
#[derive(Clone, Debug)]
pub struct StopSignal {
    inner: Arc<StopInner>,
    wake: Receiver<()>,
}

#[derive(Debug)]
struct StopInner {
    stopped: AtomicBool,
    /// Dropped on stop; nothing is ever sent.
    sender: Mutex<Option<Sender<()>>>,
}

// Compile-time assertion: StopSignal must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<StopSignal>();
};

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    /// Create a signal in the "keep running" state.
    pub fn new() -> Self {
        let (sender, wake) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(StopInner {
                stopped: AtomicBool::new(false),
                sender: Mutex::new(Some(sender)),
            }),
            wake,
        }
    }

    /// Request stop and wake every waiter. Idempotent.
    pub fn request_stop(&self) {
        self.inner.stopped.store(true, Ordering::Release);
        self.inner
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless stop is requested first.
    ///
    /// Returns `true` if the full duration elapsed with no stop request,
    /// `false` if the caller should stop.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_stopped() {
            return false;
        }
        match self.wake.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => !self.is_stopped(),
            Err(RecvTimeoutError::Disconnected) | Ok(()) => false,
        }
    }

    /// Channel that disconnects when stop is requested, for `select!`.
    pub(crate) fn wake_channel(&self) -> &Receiver<()> {
        &self.wake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn sleep_runs_full_duration_without_stop() {
        let stop = StopSignal::new();
        let start = Instant::now();
        assert!(stop.sleep(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn request_stop_wakes_long_sleep() {
        let stop = StopSignal::new();
        let sleeper = stop.clone();
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let completed = sleeper.sleep(Duration::from_secs(30));
            (completed, start.elapsed())
        });
        thread::sleep(Duration::from_millis(20));
        stop.request_stop();
        let (completed, elapsed) = handle.join().unwrap();
        assert!(!completed);
        assert!(elapsed < Duration::from_secs(5), "sleep took {elapsed:?}");
    }

    #[test]
    fn stopped_signal_never_sleeps() {
        let stop = StopSignal::new();
        stop.request_stop();
        stop.request_stop();
        assert!(stop.is_stopped());
        let start = Instant::now();
        assert!(!stop.sleep(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
