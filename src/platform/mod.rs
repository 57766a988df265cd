//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (`clock`)
//! - Playfield geometry (`BoundsSource`)
//!
//! Storage lives in `persistence`.

pub mod clock;
#[cfg(target_arch = "wasm32")]
pub mod interval;

pub use clock::{Clock, ClockHandle, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::{TickSink, TokioClock};
#[cfg(target_arch = "wasm32")]
pub use interval::IntervalClock;

use std::sync::{Arc, PoisonError, RwLock};

use crate::sim::Bounds;

/// Supplies the current playfield rectangle
///
/// Queried when a round starts and before every re-placement, so hosts can
/// report resizes without telling the engine.
pub trait BoundsSource {
    fn bounds(&self) -> Bounds;
}

impl BoundsSource for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

impl<F: Fn() -> Bounds> BoundsSource for F {
    fn bounds(&self) -> Bounds {
        self()
    }
}

/// Bounds the host updates on resize; clones share the same rectangle
#[derive(Debug, Clone, Default)]
pub struct SharedBounds {
    inner: Arc<RwLock<Bounds>>,
}

impl SharedBounds {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            inner: Arc::new(RwLock::new(bounds)),
        }
    }

    pub fn set(&self, bounds: Bounds) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = bounds;
    }

    /// Update only the size, keeping inset and margin
    pub fn resize(&self, width: f32, height: f32) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.width = width;
        guard.height = height;
    }
}

impl BoundsSource for SharedBounds {
    fn bounds(&self) -> Bounds {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_bounds_resize() {
        let shared = SharedBounds::new(Bounds::new(100.0, 100.0).with_reserved_top(20.0));
        let view = shared.clone();
        shared.resize(300.0, 500.0);

        let b = view.bounds();
        assert_eq!((b.width, b.height), (300.0, 500.0));
        assert_eq!(b.reserved_top, 20.0);
    }

    #[test]
    fn test_closure_bounds() {
        let source = || Bounds::new(1.0, 2.0);
        assert_eq!(source.bounds().height, 2.0);
    }
}
