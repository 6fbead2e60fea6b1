//! The timer's single mutable entity, doubling as the persisted snapshot.
//!
//! Every field carries a serde default so a snapshot written before a field
//! existed still loads -- missing fields take their documented defaults,
//! present fields are preserved exactly. There is no migration step.

use serde::{Deserialize, Serialize};

use super::mode::TimerMode;

/// Lower bound for the daily session goal.
pub const SESSION_GOAL_MIN: u32 = 1;
/// Upper bound for the daily session goal.
pub const SESSION_GOAL_MAX: u32 = 12;

/// Complete timer state. One instance per controller; mutated only through
/// [`TimerEngine`](super::TimerEngine) operations and the tick callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Seconds remaining in the current interval.
    #[serde(default = "default_time_left")]
    pub time_left: u32,
    #[serde(default)]
    pub mode: TimerMode,
    /// True iff a countdown scheduler is armed.
    #[serde(default)]
    pub is_running: bool,
    /// Completed Work intervals since the count was last zeroed.
    #[serde(default)]
    pub completed_pomodoros: u32,
    /// User-configured daily target, `1..=12`. A UI target, not a limit.
    #[serde(default = "default_session_goal")]
    pub session_goal: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub auto_cycle_enabled: bool,
    /// Opaque reference to an external task; never validated here.
    #[serde(default)]
    pub active_task_id: Option<i64>,
}

fn default_time_left() -> u32 {
    TimerMode::Work.duration_secs()
}

fn default_session_goal() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            time_left: default_time_left(),
            mode: TimerMode::Work,
            is_running: false,
            completed_pomodoros: 0,
            session_goal: default_session_goal(),
            sound_enabled: true,
            auto_cycle_enabled: true,
            active_task_id: None,
        }
    }
}

impl TimerState {
    /// Clamp a session goal into its valid range.
    pub fn clamp_session_goal(n: u32) -> u32 {
        n.clamp(SESSION_GOAL_MIN, SESSION_GOAL_MAX)
    }

    /// Force a loaded snapshot back into its invariants.
    ///
    /// `time_left` is clamped to `0..=duration(mode)`, the session goal to
    /// its range, and `is_running` is cleared -- a freshly loaded timer is
    /// always stopped until something explicitly starts it.
    pub fn sanitize(&mut self) {
        self.time_left = self.time_left.min(self.mode.duration_secs());
        self.session_goal = Self::clamp_session_goal(self.session_goal);
        self.is_running = false;
    }

    /// Fraction of the current interval already elapsed, `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.mode.duration_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.time_left as f64 / total as f64)
    }

    /// Remaining time formatted `M:SS` for display surfaces.
    pub fn display_time(&self) -> String {
        format!("{}:{:02}", self.time_left / 60, self.time_left % 60)
    }
}
