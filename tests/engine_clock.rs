// Drives the engine with the real tokio ticker on a paused clock, so whole
// rounds complete instantly while ticks still arrive in wall-clock order.

#![cfg(not(target_arch = "wasm32"))]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tap_rush::{Bounds, Engine, GameEvent, MemoryStore, RoundState, Settings};
use tokio::runtime::Handle;
use tokio::time::sleep;

fn engine(round_secs: u32, store: MemoryStore) -> Engine<MemoryStore, Bounds> {
    let settings = Settings {
        round_secs,
        seed: Some(7),
        ..Settings::default()
    };
    Engine::new(settings, store, Bounds::new(800.0, 600.0), Handle::current())
}

#[tokio::test(start_paused = true)]
async fn round_ends_when_countdown_expires() {
    let store = MemoryStore::new();
    let engine = engine(3, store.clone());

    engine.start();
    engine.tap();
    engine.tap();

    sleep(Duration::from_millis(3500)).await;

    let snap = engine.snapshot();
    assert_eq!(snap.state, RoundState::Ended);
    assert_eq!(snap.time_remaining, 0);
    assert_eq!(snap.score, 2);
    assert_eq!(engine.current_best(), 2);
    assert_eq!(store.saves(), 1);
    assert!(!engine.is_clock_armed());
}

#[tokio::test(start_paused = true)]
async fn one_second_short_is_still_running() {
    let engine = engine(3, MemoryStore::new());
    engine.start();

    sleep(Duration::from_millis(2500)).await;

    let snap = engine.snapshot();
    assert_eq!(snap.state, RoundState::Running);
    assert_eq!(snap.time_remaining, 1);
}

#[tokio::test(start_paused = true)]
async fn first_tick_counts_from_start_not_from_task_poll() {
    let engine = engine(3, MemoryStore::new());
    engine.start();

    // Moves the clock before the ticker task is first polled
    tokio::time::advance(Duration::from_millis(600)).await;
    sleep(Duration::from_millis(500)).await;

    assert_eq!(engine.snapshot().time_remaining, 2);
}

#[tokio::test(start_paused = true)]
async fn restart_does_not_double_tick() {
    let engine = engine(3, MemoryStore::new());

    engine.start();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(engine.snapshot().time_remaining, 2);

    // Old ticker fired at 1.0s and would fire again at 2.0s
    engine.start();
    sleep(Duration::from_millis(1200)).await;

    let snap = engine.snapshot();
    assert_eq!(snap.state, RoundState::Running);
    assert_eq!(snap.time_remaining, 2);
}

#[tokio::test(start_paused = true)]
async fn disband_stops_ticks() {
    let engine = engine(5, MemoryStore::new());
    engine.start();
    sleep(Duration::from_millis(1500)).await;

    engine.disband();
    engine.disband();
    sleep(Duration::from_secs(10)).await;

    let snap = engine.snapshot();
    assert_eq!(snap.state, RoundState::Running);
    assert_eq!(snap.time_remaining, 4);
    assert!(!engine.is_clock_armed());
}

#[tokio::test(start_paused = true)]
async fn observers_follow_the_clock() {
    let engine = engine(3, MemoryStore::with_best(10));
    let causes = Arc::new(Mutex::new(Vec::new()));
    let sink = causes.clone();
    engine.on_state_change(move |snap| sink.lock().unwrap().push(snap.cause));

    engine.start();
    engine.tap();
    sleep(Duration::from_millis(3500)).await;

    assert_eq!(
        *causes.lock().unwrap(),
        vec![
            GameEvent::Started,
            GameEvent::Hit,
            GameEvent::Ticked,
            GameEvent::Ticked,
            GameEvent::Ended { new_best: false },
        ]
    );
    assert_eq!(engine.current_best(), 10);
}

#[tokio::test(start_paused = true)]
async fn best_survives_a_new_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.json");

    {
        let settings = Settings {
            round_secs: 1,
            ..Settings::default()
        };
        let engine = Engine::new(
            settings,
            tap_rush::persistence::FileStore::new(&path),
            Bounds::new(800.0, 600.0),
            Handle::current(),
        );
        engine.start();
        for _ in 0..4 {
            engine.tap();
        }
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(engine.snapshot().state, RoundState::Ended);
    }

    let engine = Engine::new(
        Settings::default(),
        tap_rush::persistence::FileStore::new(&path),
        Bounds::new(800.0, 600.0),
        Handle::current(),
    );
    assert_eq!(engine.current_best(), 4);
}
