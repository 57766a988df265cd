//! Tap Rush entry point
//!
//! Native: plays one round with a bot tapping at a human-ish pace and records
//! the best score. The web build is driven from JavaScript via `WebGame`.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    use std::time::Duration;

    use rand::Rng;
    use tap_rush::persistence::FileStore;
    use tap_rush::{Bounds, Engine, GameEvent, Settings, SharedBounds};
    use tokio::runtime::Handle;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tap Rush (native) starting...");

    let settings = Settings::load();
    let store = FileStore::default_location();
    log::info!("Best score file: {}", store.path().display());

    // Phone-sized playfield under a status header
    let bounds = SharedBounds::new(
        Bounds::new(390.0, 844.0)
            .with_reserved_top(96.0)
            .with_margin(settings.margin),
    );
    let engine = Engine::new(settings, store, bounds, Handle::current());

    engine.on_state_change(|snap| match snap.cause {
        GameEvent::Started => log::info!("Go! {}s on the clock", snap.time_remaining),
        GameEvent::Ticked => log::debug!("{}s left, score {}", snap.time_remaining, snap.score),
        GameEvent::Hit => {
            if let Some(t) = snap.target {
                log::debug!(
                    "Target moved to ({:.0}, {:.0}) size {:.0}",
                    t.center.x,
                    t.center.y,
                    t.size
                );
            }
        }
        GameEvent::Ended { new_best: true } => log::info!("New best score!"),
        GameEvent::Ended { new_best: false } | GameEvent::Reset => {}
    });

    engine.start();

    let mut rng = rand::rng();
    while engine.snapshot().is_running() {
        let reaction_ms = rng.random_range(250..900);
        tokio::time::sleep(Duration::from_millis(reaction_ms)).await;
        engine.tap();
    }

    let snap = engine.snapshot();
    println!("Time's up! Your score: {}  Best: {}", snap.score, snap.best);
    engine.disband();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
