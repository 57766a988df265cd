//! Deterministic round engine
//!
//! All gameplay logic lives here. This module must stay host-free:
//! - Ticks and taps arrive as plain method calls
//! - Injected RNG only
//! - Bounds are immutable snapshots
//! - No rendering, audio or storage backends

pub mod placement;
pub mod session;
pub mod state;

pub use placement::place;
pub use session::Session;
pub use state::{Bounds, GameEvent, RoundState, Snapshot, Target};
