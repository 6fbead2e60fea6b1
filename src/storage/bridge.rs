//! Persistence bridge between the timer engine and the durable store.
//!
//! The full [`TimerState`] is serialized under one fixed key in the `timer`
//! store after every mutation. Writes are fire-and-forget: rapid successive
//! saves may land in any order, which is fine because each one carries the
//! complete snapshot and only the last write matters. Failures are logged
//! and never surface past this module.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::timer::TimerState;

use super::database::{Database, StoreKind};

/// Fixed key the snapshot lives under in the `timer` store.
pub const SNAPSHOT_KEY: &str = "status";

/// Outcome of restoring state at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    /// The reconciled state. Always stopped, regardless of what was
    /// persisted -- a reload must not resume an unseen countdown.
    pub state: TimerState,
    /// Whether the snapshot said the timer was running when it was written.
    /// Callers that opt into auto-resume act on this explicitly.
    pub was_running: bool,
}

/// Snapshots timer state to the durable store and restores it at startup.
///
/// Writes are tagged with a sequence number taken at call time; a write
/// that reaches the store after a newer one is discarded. That keeps
/// last-write-wins meaning "latest state wins" even though the blocking
/// pool completes writes in arbitrary order.
#[derive(Clone)]
pub struct PersistenceBridge {
    db: Arc<Mutex<Database>>,
    next_seq: Arc<AtomicU64>,
    applied_seq: Arc<AtomicU64>,
}

impl PersistenceBridge {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            next_seq: Arc::new(AtomicU64::new(0)),
            applied_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared handle to the underlying store, for sibling stores (tasks).
    pub fn database(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }

    /// Queue an asynchronous snapshot write. Returns immediately; a failed
    /// write is logged and dropped, leaving the in-memory state untouched.
    ///
    /// Must be called from within a tokio runtime.
    pub fn save_async(&self, state: TimerState) {
        let seq = self.next_seq();
        let bridge = self.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = bridge.write_snapshot(&state, seq) {
                log::warn!("timer snapshot write failed: {e}");
            }
        });
    }

    /// Write the snapshot on the calling thread. Used on the process-exit
    /// path where the write must finish before teardown.
    ///
    /// # Errors
    /// Returns the store error; the caller decides whether to log or ignore.
    pub fn save_blocking(&self, state: &TimerState) -> Result<(), StoreError> {
        let seq = self.next_seq();
        self.write_snapshot(state, seq)
    }

    /// Restore state from the store, reconciling with defaults.
    ///
    /// A missing, unreadable or partially shaped snapshot never fails: any
    /// field the stored value lacks takes its default, and a snapshot that
    /// does not parse at all falls back to the full default state.
    pub fn load(&self) -> Restored {
        let raw = {
            let db = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            db.get(StoreKind::Timer, SNAPSHOT_KEY)
        };
        let mut state = match raw {
            Ok(Some(json)) => match serde_json::from_str::<TimerState>(&json) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("stored timer snapshot unreadable, using defaults: {e}");
                    TimerState::default()
                }
            },
            Ok(None) => TimerState::default(),
            Err(e) => {
                log::warn!("timer snapshot read failed, using defaults: {e}");
                TimerState::default()
            }
        };
        let was_running = state.is_running;
        state.sanitize();
        Restored { state, was_running }
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn write_snapshot(&self, state: &TimerState, seq: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        let db = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // A newer snapshot already landed; this one carries stale state.
        if self.applied_seq.load(Ordering::SeqCst) > seq {
            log::debug!("skipping stale snapshot write (seq {seq})");
            return Ok(());
        }
        db.put(StoreKind::Timer, SNAPSHOT_KEY, &json)?;
        self.applied_seq.fetch_max(seq, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::timer::TimerMode;

    use super::*;

    fn memory_bridge() -> PersistenceBridge {
        PersistenceBridge::new(Database::open_memory().unwrap())
    }

    #[test]
    fn missing_snapshot_yields_defaults() {
        let bridge = memory_bridge();
        let restored = bridge.load();
        assert_eq!(restored.state, TimerState::default());
        assert!(!restored.was_running);
    }

    #[test]
    fn save_load_roundtrip_preserves_fields() {
        let bridge = memory_bridge();
        let state = TimerState {
            time_left: 123,
            mode: TimerMode::ShortBreak,
            is_running: false,
            completed_pomodoros: 5,
            session_goal: 10,
            sound_enabled: false,
            auto_cycle_enabled: false,
            active_task_id: Some(7),
        };
        bridge.save_blocking(&state).unwrap();
        let restored = bridge.load();
        assert_eq!(restored.state, state);
        assert!(!restored.was_running);
    }

    #[test]
    fn running_snapshot_loads_stopped_but_reports_it() {
        let bridge = memory_bridge();
        let state = TimerState {
            time_left: 900,
            is_running: true,
            ..TimerState::default()
        };
        bridge.save_blocking(&state).unwrap();
        let restored = bridge.load();
        assert!(!restored.state.is_running);
        assert!(restored.was_running);
        assert_eq!(restored.state.time_left, 900);
    }

    #[test]
    fn partial_snapshot_fills_missing_fields() {
        let bridge = memory_bridge();
        {
            let db = bridge.database();
            let db = db.lock().unwrap();
            db.put(
                StoreKind::Timer,
                SNAPSHOT_KEY,
                r#"{"timeLeft": 60, "isRunning": false, "activeTaskId": null}"#,
            )
            .unwrap();
        }
        let restored = bridge.load();
        assert_eq!(restored.state.time_left, 60);
        assert_eq!(restored.state.mode, TimerMode::Work);
        assert_eq!(restored.state.session_goal, 4);
        assert!(restored.state.sound_enabled);
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_defaults() {
        let bridge = memory_bridge();
        {
            let db = bridge.database();
            let db = db.lock().unwrap();
            db.put(StoreKind::Timer, SNAPSHOT_KEY, "not json").unwrap();
        }
        assert_eq!(bridge.load().state, TimerState::default());
    }

    #[test]
    fn out_of_range_snapshot_is_clamped_on_load() {
        let bridge = memory_bridge();
        {
            let db = bridge.database();
            let db = db.lock().unwrap();
            db.put(
                StoreKind::Timer,
                SNAPSHOT_KEY,
                r#"{"timeLeft": 99999, "mode": "shortBreak", "sessionGoal": 40}"#,
            )
            .unwrap();
        }
        let restored = bridge.load();
        assert_eq!(restored.state.time_left, 300);
        assert_eq!(restored.state.session_goal, 12);
    }

    #[test]
    fn write_landing_after_a_newer_one_is_discarded() {
        let bridge = memory_bridge();
        let older = TimerState {
            time_left: 200,
            ..TimerState::default()
        };
        let newer = TimerState {
            time_left: 100,
            ..TimerState::default()
        };
        let seq_old = bridge.next_seq();
        let seq_new = bridge.next_seq();
        // The newer snapshot reaches the store first; the straggler must
        // not clobber it.
        bridge.write_snapshot(&newer, seq_new).unwrap();
        bridge.write_snapshot(&older, seq_old).unwrap();
        assert_eq!(bridge.load().state.time_left, 100);
    }

    #[test]
    fn last_write_wins() {
        let bridge = memory_bridge();
        let mut state = TimerState::default();
        for t in [1400, 1300, 1200] {
            state.time_left = t;
            bridge.save_blocking(&state).unwrap();
        }
        assert_eq!(bridge.load().state.time_left, 1200);
    }

    #[tokio::test]
    async fn async_save_lands() {
        let bridge = memory_bridge();
        let state = TimerState {
            time_left: 777,
            ..TimerState::default()
        };
        bridge.save_async(state);
        // spawn_blocking runs on the blocking pool; give it a beat.
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            if bridge.load().state.time_left == 777 {
                return;
            }
        }
        panic!("async save never landed");
    }
}
