//! Tap Rush - A reflex tap-the-target game engine
//!
//! Core modules:
//! - `sim`: Deterministic round engine (state machine, target placement)
//! - `platform`: Clock and playfield bounds supplied by the host
//! - `persistence`: Best-score storage backends
//! - `best_score`: Best-score bookkeeping on top of a store
//! - `settings`: Engine configuration

pub mod best_score;
#[cfg(not(target_arch = "wasm32"))]
pub mod engine;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use best_score::BestScore;
#[cfg(not(target_arch = "wasm32"))]
pub use engine::Engine;
pub use persistence::{MemoryStore, ScoreStore, StoreError};
pub use platform::{BoundsSource, SharedBounds};
pub use settings::Settings;
pub use sim::{Bounds, GameEvent, RoundState, Session, Snapshot, Target};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Clock period: one countdown tick per second
    pub const TICK_PERIOD: Duration = Duration::from_secs(1);

    /// Round length
    pub const DEFAULT_ROUND_SECS: u32 = 30;

    /// Target diameter range
    pub const DEFAULT_SIZE_MIN: f32 = 50.0;
    pub const DEFAULT_SIZE_MAX: f32 = 120.0;

    /// Gap kept between the target and the playfield edges
    pub const DEFAULT_MARGIN: f32 = 24.0;

    /// Share of the playfield height targets may occupy (rest is controls)
    pub const DEFAULT_PLAY_AREA_FRACTION: f32 = 0.6;

    /// Storage key for the best score (LocalStorage on web)
    pub const BEST_SCORE_KEY: &str = "simple-tap-game-best";
}
