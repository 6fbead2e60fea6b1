//! End-to-end countdown and persistence flows against an on-disk store.

use std::sync::Arc;
use std::time::Duration;

use pomotick::{
    Config, Database, NullNotifier, NullSound, PersistenceBridge, TimerController, TimerMode,
    TimerState,
};

fn controller_at(path: &std::path::Path, config: Config) -> TimerController {
    let bridge = PersistenceBridge::new(Database::open(path).unwrap());
    TimerController::new(
        bridge,
        config,
        Arc::new(NullNotifier),
        Arc::new(NullSound),
    )
}

#[tokio::test(start_paused = true)]
async fn full_work_interval_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");

    let controller = controller_at(&path, Config::default());
    controller.set_active_task_id(Some(42)).await;
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(1_500_500)).await;

    let state = controller.state().await;
    assert_eq!(state.mode, TimerMode::ShortBreak);
    assert_eq!(state.time_left, 300);
    assert_eq!(state.completed_pomodoros, 1);

    controller.stop().await;
    controller.shutdown().await;
    drop(controller);

    // A fresh process sees the same state, stopped.
    let bridge = PersistenceBridge::new(Database::open(&path).unwrap());
    let restored = bridge.load();
    assert_eq!(restored.state.mode, TimerMode::ShortBreak);
    assert_eq!(restored.state.time_left, 300);
    assert_eq!(restored.state.completed_pomodoros, 1);
    assert_eq!(restored.state.active_task_id, Some(42));
    assert!(!restored.state.is_running);
    assert!(!restored.was_running);
}

#[tokio::test(start_paused = true)]
async fn reload_of_a_running_timer_requires_opt_in_to_resume() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");

    let controller = controller_at(&path, Config::default());
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    controller.shutdown().await;
    drop(controller);

    // Default policy: the reloaded timer stays stopped.
    let controller = controller_at(&path, Config::default());
    assert!(controller.was_running());
    assert!(!controller.restore_autostart().await);
    let state = controller.state().await;
    assert!(!state.is_running);
    assert_eq!(state.time_left, 1490);
    // Drop without shutdown: no mutation happened, so the stored snapshot
    // still says the timer was running.
    drop(controller);

    // Opt-in policy: the countdown picks up where it left off.
    let mut config = Config::default();
    config.restore.auto_resume = true;
    let controller = controller_at(&path, config);
    assert!(controller.restore_autostart().await);
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let state = controller.state().await;
    assert!(state.is_running);
    assert_eq!(state.time_left, 1489);
}

#[tokio::test(start_paused = true)]
async fn fourth_completion_lands_in_a_long_break() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");

    let seeded = TimerState {
        time_left: 2,
        completed_pomodoros: 3,
        ..TimerState::default()
    };
    PersistenceBridge::new(Database::open(&path).unwrap())
        .save_blocking(&seeded)
        .unwrap();

    let controller = controller_at(&path, Config::default());
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(2_100)).await;

    let state = controller.state().await;
    assert_eq!(state.completed_pomodoros, 4);
    assert_eq!(state.mode, TimerMode::LongBreak);
    assert_eq!(state.time_left, 900);
}
