//! Round clocks
//!
//! A clock emits one tick per period while armed. Every `arm` returns a fresh
//! handle and ticks are delivered tagged with it, so the session can tell a
//! tick from the current arming apart from a late one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Identity of one arming of a clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockHandle(u64);

impl ClockHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Armable periodic ticker
pub trait Clock {
    /// Start ticking every `period`
    fn arm(&mut self, period: Duration) -> ClockHandle;
    /// Stop the ticks for `handle`; unknown or already disarmed handles are ignored
    fn disarm(&mut self, handle: ClockHandle);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    armed: Vec<ClockHandle>,
    period: Option<Duration>,
    arms: usize,
    disarms: usize,
}

/// Clock driven by the host (or a test) calling `Session::tick` itself
///
/// Clones share state, so a copy kept outside the session can inspect what
/// the session armed.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The single armed handle, if exactly one is armed
    pub fn armed(&self) -> Option<ClockHandle> {
        let state = self.lock();
        match state.armed.as_slice() {
            [handle] => Some(*handle),
            _ => None,
        }
    }

    pub fn armed_count(&self) -> usize {
        self.lock().armed.len()
    }

    pub fn is_armed(&self) -> bool {
        self.armed_count() > 0
    }

    /// Period of the most recent arming
    pub fn period(&self) -> Option<Duration> {
        self.lock().period
    }

    pub fn arms(&self) -> usize {
        self.lock().arms
    }

    pub fn disarms(&self) -> usize {
        self.lock().disarms
    }
}

impl Clock for ManualClock {
    fn arm(&mut self, period: Duration) -> ClockHandle {
        let mut state = self.lock();
        state.next_id += 1;
        let handle = ClockHandle(state.next_id);
        state.armed.push(handle);
        state.period = Some(period);
        state.arms += 1;
        handle
    }

    fn disarm(&mut self, handle: ClockHandle) {
        let mut state = self.lock();
        let before = state.armed.len();
        state.armed.retain(|h| *h != handle);
        if state.armed.len() != before {
            state.disarms += 1;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use self::tokio_clock::{TickSink, TokioClock};

#[cfg(not(target_arch = "wasm32"))]
mod tokio_clock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::runtime::Handle;
    use tokio::task::JoinHandle;
    use tokio::time::{self, Instant};

    use super::{Clock, ClockHandle};

    /// Receives ticks from a `TokioClock`
    pub type TickSink = Arc<dyn Fn(ClockHandle) + Send + Sync>;

    /// Clock backed by a tokio interval task per arming
    pub struct TokioClock {
        runtime: Handle,
        sink: TickSink,
        next_id: u64,
        tasks: HashMap<ClockHandle, JoinHandle<()>>,
    }

    impl TokioClock {
        pub fn new(runtime: Handle, sink: TickSink) -> Self {
            Self {
                runtime,
                sink,
                next_id: 0,
                tasks: HashMap::new(),
            }
        }

        pub fn armed_count(&self) -> usize {
            self.tasks.len()
        }
    }

    impl Clock for TokioClock {
        fn arm(&mut self, period: Duration) -> ClockHandle {
            self.next_id += 1;
            let handle = ClockHandle(self.next_id);
            let sink = self.sink.clone();
            // First tick one full period after arming, not after the task
            // first gets polled
            let first = Instant::now() + period;

            let task = self.runtime.spawn(async move {
                let mut interval = time::interval_at(first, period);
                loop {
                    interval.tick().await;
                    sink(handle);
                }
            });
            self.tasks.insert(handle, task);
            handle
        }

        fn disarm(&mut self, handle: ClockHandle) {
            if let Some(task) = self.tasks.remove(&handle) {
                task.abort();
            }
        }
    }

    impl Drop for TokioClock {
        fn drop(&mut self) {
            for (_, task) in self.tasks.drain() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_handles_are_unique() {
        let mut clock = ManualClock::new();
        let a = clock.arm(Duration::from_secs(1));
        clock.disarm(a);
        let b = clock.arm(Duration::from_secs(1));
        assert_ne!(a, b);
        assert_eq!(clock.armed(), Some(b));
        assert_eq!(clock.period(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_manual_clock_disarm_is_idempotent() {
        let mut clock = ManualClock::new();
        let observed = clock.clone();
        let h = clock.arm(Duration::from_secs(1));
        clock.disarm(h);
        clock.disarm(h);
        assert!(!observed.is_armed());
        assert_eq!(observed.arms(), 1);
        assert_eq!(observed.disarms(), 1);
    }
}
