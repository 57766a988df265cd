//! Thread-safe engine for native hosts
//!
//! Owns a `Session` behind a mutex. Ticks come from a tokio interval task and
//! taps from whatever thread the UI runs on; both go through the same lock so
//! they can never interleave inside a transition.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rand::Rng;
use rand_pcg::Pcg32;
use tokio::runtime::Handle;

use crate::persistence::ScoreStore;
use crate::platform::{BoundsSource, ClockHandle, TickSink, TokioClock};
use crate::settings::Settings;
use crate::sim::{Session, Snapshot};

type SharedSession<S, B, R> = Mutex<Session<TokioClock, S, B, R>>;

/// Cloneable handle to a running game
pub struct Engine<S, B, R = Pcg32> {
    inner: Arc<SharedSession<S, B, R>>,
}

impl<S, B, R> Clone for Engine<S, B, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, B> Engine<S, B, Pcg32>
where
    S: ScoreStore + Send + 'static,
    B: BoundsSource + Send + 'static,
{
    /// Build an engine whose clock runs on `runtime`
    pub fn new(settings: Settings, store: S, bounds: B, runtime: Handle) -> Self {
        Self::build(runtime, move |clock| Session::new(settings, store, bounds, clock))
    }
}

impl<S, B, R> Engine<S, B, R>
where
    S: ScoreStore + Send + 'static,
    B: BoundsSource + Send + 'static,
    R: Rng + Send + 'static,
{
    /// Build an engine with an explicit random source
    pub fn with_rng(settings: Settings, store: S, bounds: B, rng: R, runtime: Handle) -> Self {
        Self::build(runtime, move |clock| {
            Session::with_rng(settings, store, bounds, clock, rng)
        })
    }

    fn build<F>(runtime: Handle, make: F) -> Self
    where
        F: FnOnce(TokioClock) -> Session<TokioClock, S, B, R>,
    {
        // The ticker only holds a weak ref: dropping the last Engine drops the
        // session, which disarms the clock
        let inner = Arc::new_cyclic(|weak: &Weak<SharedSession<S, B, R>>| {
            let weak = weak.clone();
            let sink: TickSink = Arc::new(move |handle: ClockHandle| {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).clock_fired(handle);
                }
            });
            Mutex::new(make(TokioClock::new(runtime, sink)))
        });
        Self { inner }
    }

    fn session(&self) -> MutexGuard<'_, Session<TokioClock, S, B, R>> {
        lock(&self.inner)
    }

    pub fn start(&self) {
        self.session().start();
    }

    pub fn tap(&self) {
        self.session().tap();
    }

    pub fn reset(&self) {
        self.session().reset();
    }

    pub fn disband(&self) {
        self.session().disband();
    }

    pub fn current_best(&self) -> u32 {
        self.session().current_best()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session().snapshot()
    }

    /// Observers run on the ticking or tapping thread with the session locked;
    /// they must not call back into the engine.
    pub fn on_state_change<F>(&self, observer: F)
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.session().on_state_change(observer);
    }

    pub fn is_clock_armed(&self) -> bool {
        self.session().is_clock_armed()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
