//! Round state machine
//!
//! ```text
//!          start                 tick (t == 1)
//!   Idle ---------> Running ---------------------> Ended
//!    ^              |  ^  tap / tick (t > 1)         |
//!    |              +--+                             |
//!    +---- reset ---------------- start -------------+ (back to Running)
//! ```
//!
//! Every (state, command) pair is defined. Commands that make no sense in
//! the current state are ignored rather than reported.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::placement::place;
use super::state::{GameEvent, RoundState, Snapshot, Target};
use crate::best_score::BestScore;
use crate::consts::TICK_PERIOD;
use crate::persistence::ScoreStore;
use crate::platform::{BoundsSource, Clock, ClockHandle};
use crate::settings::Settings;

/// Callback invoked after every transition
///
/// Native observers may run on the ticker thread, so they must be `Send`.
/// The browser is single-threaded and JS callbacks are not.
#[cfg(not(target_arch = "wasm32"))]
pub type Observer = Box<dyn FnMut(&Snapshot) + Send>;
#[cfg(target_arch = "wasm32")]
pub type Observer = Box<dyn FnMut(&Snapshot)>;

/// One player's game: the current round plus the best score
pub struct Session<C: Clock, S, B, R = Pcg32> {
    settings: Settings,
    state: RoundState,
    score: u32,
    time_remaining: u32,
    target: Option<Target>,
    last_event: GameEvent,
    best: BestScore<S>,
    clock: C,
    /// Handle of the one arming currently allowed to tick us
    armed: Option<ClockHandle>,
    bounds: B,
    rng: R,
    observers: Vec<Observer>,
}

impl<C, S, B> Session<C, S, B, Pcg32>
where
    C: Clock,
    S: ScoreStore,
    B: BoundsSource,
{
    /// Build a session seeded from `settings.seed` (or entropy)
    pub fn new(settings: Settings, store: S, bounds: B, clock: C) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::debug!("Session RNG seed: {}", seed);
        Self::with_rng(settings, store, bounds, clock, Pcg32::seed_from_u64(seed))
    }
}

impl<C, S, B, R> Session<C, S, B, R>
where
    C: Clock,
    S: ScoreStore,
    B: BoundsSource,
    R: Rng,
{
    /// Build a session with an explicit random source
    pub fn with_rng(settings: Settings, store: S, bounds: B, clock: C, rng: R) -> Self {
        let settings = settings.validated();
        Self {
            state: RoundState::Idle,
            score: 0,
            time_remaining: settings.round_secs,
            target: None,
            last_event: GameEvent::Reset,
            best: BestScore::load(store),
            clock,
            armed: None,
            bounds,
            rng,
            observers: Vec::new(),
            settings,
        }
    }

    /// Begin a fresh round from any state
    pub fn start(&mut self) {
        // Never leave a previous tick stream running
        self.disarm_clock();

        self.state = RoundState::Running;
        self.score = 0;
        self.time_remaining = self.settings.round_secs;
        self.target = Some(self.place_target());
        self.armed = Some(self.clock.arm(TICK_PERIOD));

        log::info!("Round started ({}s)", self.settings.round_secs);
        self.notify(GameEvent::Started);
    }

    /// Player hit the target
    pub fn tap(&mut self) {
        if self.state != RoundState::Running {
            return;
        }

        self.score += 1;
        self.target = Some(self.place_target());
        log::debug!("Hit, score {}", self.score);
        self.notify(GameEvent::Hit);
    }

    /// One second elapsed
    pub fn tick(&mut self) {
        if self.state != RoundState::Running {
            return;
        }

        if self.time_remaining > 1 {
            self.time_remaining -= 1;
            self.notify(GameEvent::Ticked);
        } else {
            self.finish();
        }
    }

    /// Tick delivered by a clock; dropped unless `handle` is the current arming
    pub fn clock_fired(&mut self, handle: ClockHandle) {
        if self.armed != Some(handle) {
            log::trace!("Dropping stale tick from clock {}", handle.id());
            return;
        }
        self.tick();
    }

    /// Abandon any round and go back to idle
    pub fn reset(&mut self) {
        self.disarm_clock();
        self.state = RoundState::Idle;
        self.score = 0;
        self.time_remaining = self.settings.round_secs;
        self.target = None;
        self.notify(GameEvent::Reset);
    }

    /// Stop the clock (view going away); safe to call any number of times
    pub fn disband(&mut self) {
        self.disarm_clock();
    }

    /// Register a state-change observer
    #[cfg(not(target_arch = "wasm32"))]
    pub fn on_state_change<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Register a state-change observer
    #[cfg(target_arch = "wasm32")]
    pub fn on_state_change<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn current_best(&self) -> u32 {
        self.best.get()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            score: self.score,
            time_remaining: self.time_remaining,
            round_secs: self.settings.round_secs,
            target: self.target,
            best: self.best.get(),
            cause: self.last_event,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_clock_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn store(&self) -> &S {
        self.best.store()
    }

    /// Countdown hit zero
    fn finish(&mut self) {
        self.time_remaining = 0;
        self.disarm_clock();
        self.state = RoundState::Ended;

        let new_best = self.best.record(self.score);
        log::info!(
            "Round over: score {}, best {}{}",
            self.score,
            self.best.get(),
            if new_best { " (new best)" } else { "" }
        );
        self.notify(GameEvent::Ended { new_best });
    }

    fn place_target(&mut self) -> Target {
        let bounds = self.bounds.bounds();
        place(&bounds, &self.settings, &mut self.rng)
    }

    fn disarm_clock(&mut self) {
        if let Some(handle) = self.armed.take() {
            self.clock.disarm(handle);
        }
    }

    fn invariants_hold(&self) -> bool {
        let secs = self.settings.round_secs;
        match self.state {
            RoundState::Idle => self.time_remaining == secs && self.score == 0,
            RoundState::Running => self.time_remaining > 0 && self.time_remaining <= secs,
            RoundState::Ended => self.time_remaining == 0 && self.armed.is_none(),
        }
    }

    fn notify(&mut self, event: GameEvent) {
        debug_assert!(self.invariants_hold(), "broken round invariant: {:?}", self.snapshot());
        self.last_event = event;
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

impl<C: Clock, S, B, R> Drop for Session<C, S, B, R> {
    fn drop(&mut self) {
        if let Some(handle) = self.armed.take() {
            self.clock.disarm(handle);
        }
    }
}
