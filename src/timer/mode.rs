use serde::{Deserialize, Serialize};

/// Nominal Work interval duration in seconds (25 minutes).
pub const WORK_SECS: u32 = 1500;
/// Nominal short break duration in seconds (5 minutes).
pub const SHORT_BREAK_SECS: u32 = 300;
/// Nominal long break duration in seconds (15 minutes).
pub const LONG_BREAK_SECS: u32 = 900;

/// The three interval kinds the timer cycles through.
///
/// Serialized names match the persisted snapshot schema
/// (`"work"` / `"shortBreak"` / `"longBreak"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Fixed nominal duration of an interval in this mode.
    pub fn duration_secs(self) -> u32 {
        match self {
            TimerMode::Work => WORK_SECS,
            TimerMode::ShortBreak => SHORT_BREAK_SECS,
            TimerMode::LongBreak => LONG_BREAK_SECS,
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Work)
    }

    /// Human-readable label for UI surfaces.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Work
    }
}
