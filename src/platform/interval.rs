//! Browser clock built on `window.setInterval`

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::clock::{Clock, ClockHandle};

/// Receives ticks from an `IntervalClock`
pub type TickCallback = Rc<dyn Fn(ClockHandle)>;

struct Armed {
    interval_id: i32,
    callback: Closure<dyn FnMut()>,
}

pub struct IntervalClock {
    sink: TickCallback,
    next_id: u64,
    active: HashMap<ClockHandle, Armed>,
    // Disarm can run inside the interval's own callback (the last tick of a
    // round); its closure must outlive that call, so it is parked here and
    // freed on the next arm.
    retired: Vec<Closure<dyn FnMut()>>,
}

impl IntervalClock {
    pub fn new(sink: TickCallback) -> Self {
        Self {
            sink,
            next_id: 0,
            active: HashMap::new(),
            retired: Vec::new(),
        }
    }
}

impl Clock for IntervalClock {
    fn arm(&mut self, period: Duration) -> ClockHandle {
        self.retired.clear();
        self.next_id += 1;
        let handle = ClockHandle::new(self.next_id);

        let sink = self.sink.clone();
        let callback = Closure::<dyn FnMut()>::new(move || sink(handle));

        let Some(window) = web_sys::window() else {
            log::warn!("No window, round clock not started");
            return handle;
        };
        let millis = period.as_millis().min(i32::MAX as u128) as i32;
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        ) {
            Ok(interval_id) => {
                self.active.insert(
                    handle,
                    Armed {
                        interval_id,
                        callback,
                    },
                );
            }
            Err(e) => log::warn!("setInterval failed: {:?}", e),
        }
        handle
    }

    fn disarm(&mut self, handle: ClockHandle) {
        if let Some(armed) = self.active.remove(&handle) {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(armed.interval_id);
            }
            self.retired.push(armed.callback);
        }
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            for armed in self.active.values() {
                window.clear_interval_with_handle(armed.interval_id);
            }
        }
    }
}
