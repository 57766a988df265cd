//! JavaScript bindings for the web build
//!
//! The page renders from `snapshotJson()` (or the JSON passed to an
//! `onStateChange` callback) and forwards clicks on the target to `tap()`.
//! Ticks come from `setInterval`, the best score from LocalStorage.

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::platform::interval::{IntervalClock, TickCallback};
use crate::platform::{ClockHandle, SharedBounds};
use crate::settings::Settings;
use crate::sim::{Bounds, Session};

type WebSession = Session<IntervalClock, LocalStorageStore, SharedBounds>;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Tap Rush (web) starting...");
}

/// One game bound to the page
#[wasm_bindgen]
pub struct WebGame {
    inner: Rc<RefCell<WebSession>>,
    bounds: SharedBounds,
}

#[wasm_bindgen]
impl WebGame {
    /// `reserved_top` is the height of the page header above the playfield
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, reserved_top: f32) -> WebGame {
        let mut settings = Settings::load();
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }

        let bounds = SharedBounds::new(
            Bounds::new(width, height)
                .with_reserved_top(reserved_top)
                .with_margin(settings.margin),
        );

        let session_bounds = bounds.clone();
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<WebSession>>| {
            let weak = weak.clone();
            let sink: TickCallback = Rc::new(move |handle: ClockHandle| {
                if let Some(inner) = weak.upgrade() {
                    match inner.try_borrow_mut() {
                        Ok(mut session) => session.clock_fired(handle),
                        Err(_) => log::warn!("Tick dropped, session busy"),
                    };
                }
            });
            RefCell::new(Session::new(
                settings,
                LocalStorageStore::new(),
                session_bounds,
                IntervalClock::new(sink),
            ))
        });

        WebGame { inner, bounds }
    }

    pub fn start(&self) {
        if let Some(mut session) = self.session("start") {
            session.start();
        }
    }

    pub fn tap(&self) {
        if let Some(mut session) = self.session("tap") {
            session.tap();
        }
    }

    pub fn reset(&self) {
        if let Some(mut session) = self.session("reset") {
            session.reset();
        }
    }

    /// Call when the page/view goes away
    pub fn disband(&self) {
        if let Some(mut session) = self.session("disband") {
            session.disband();
        }
    }

    /// Register `cb(json)` to run after every transition
    ///
    /// The callback runs while the game is mid-transition. It must not call
    /// back into this `WebGame` synchronously; such calls are dropped with a
    /// warning. Defer them with `setTimeout` or a microtask instead.
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, cb: js_sys::Function) {
        if let Some(mut session) = self.session("onStateChange") {
            session.on_state_change(move |snapshot| {
                let json = JsValue::from_str(&snapshot.to_json());
                if let Err(err) = cb.call1(&JsValue::NULL, &json) {
                    log::warn!("onStateChange callback threw: {:?}", err);
                }
            });
        }
    }

    /// Report a new playfield size (window resize)
    pub fn resize(&self, width: f32, height: f32) {
        self.bounds.resize(width, height);
    }

    #[wasm_bindgen(js_name = currentBest)]
    pub fn current_best(&self) -> u32 {
        match self.inner.try_borrow() {
            Ok(session) => session.current_best(),
            Err(_) => {
                log::warn!("currentBest called during a transition");
                0
            }
        }
    }

    /// Current state as JSON: `{state, score, time_remaining, target, best, ...}`
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        match self.inner.try_borrow() {
            Ok(session) => session.snapshot().to_json(),
            Err(_) => {
                log::warn!("snapshotJson called during a transition");
                String::new()
            }
        }
    }
}

impl WebGame {
    fn session(&self, op: &str) -> Option<RefMut<'_, WebSession>> {
        match self.inner.try_borrow_mut() {
            Ok(session) => Some(session),
            Err(_) => {
                log::warn!("{} ignored, called from inside a state change callback", op);
                None
            }
        }
    }
}
