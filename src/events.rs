//! Timer events.
//!
//! Every state change produces an [`Event`]. The UI shell subscribes via the
//! controller's broadcast channel; side-effect listeners (notification,
//! sound) are driven from the same stream instead of being called from
//! inside the state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// Manual advance through the cycle. Carries no completion side effects.
    TimerSkipped {
        from_mode: TimerMode,
        to_mode: TimerMode,
        completed_pomodoros: u32,
        at: DateTime<Utc>,
    },
    /// One second elapsed while running.
    Tick {
        mode: TimerMode,
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. `mode` is the interval that ended.
    IntervalCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// Auto-cycle applied the mode cycle policy after a completion.
    ModeAdvanced {
        mode: TimerMode,
        time_left: u32,
        completed_pomodoros: u32,
        at: DateTime<Utc>,
    },
    /// Full state, emitted after setting changes and on demand.
    StateSnapshot {
        mode: TimerMode,
        time_left: u32,
        is_running: bool,
        completed_pomodoros: u32,
        session_goal: u32,
        sound_enabled: bool,
        auto_cycle_enabled: bool,
        active_task_id: Option<i64>,
        progress: f64,
        display_time: String,
        at: DateTime<Utc>,
    },
}
