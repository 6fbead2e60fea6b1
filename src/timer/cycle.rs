//! Mode cycle policy.
//!
//! Pure decision function: given the mode that just ended and the completed
//! count, produce the next mode, its duration, and the new count. Used by
//! both natural completions and manual skips -- the two differ only in side
//! effects, never in the transition itself.

use super::mode::TimerMode;

/// How many Work completions trigger a long break.
pub const POMODOROS_PER_LONG_BREAK: u32 = 4;

/// Result of advancing the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub mode: TimerMode,
    pub duration_secs: u32,
    pub completed_pomodoros: u32,
}

/// Advance the Work / break cycle.
///
/// Finishing Work increments the count; every 4th completion earns a long
/// break, the rest a short one. Finishing either break returns to Work and
/// leaves the count alone.
pub fn next_mode(current: TimerMode, completed_pomodoros: u32) -> CycleOutcome {
    match current {
        TimerMode::Work => {
            let completed = completed_pomodoros + 1;
            let mode = if completed % POMODOROS_PER_LONG_BREAK == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            CycleOutcome {
                mode,
                duration_secs: mode.duration_secs(),
                completed_pomodoros: completed,
            }
        }
        TimerMode::ShortBreak | TimerMode::LongBreak => CycleOutcome {
            mode: TimerMode::Work,
            duration_secs: TimerMode::Work.duration_secs(),
            completed_pomodoros,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_completion_increments_count() {
        let out = next_mode(TimerMode::Work, 0);
        assert_eq!(out.completed_pomodoros, 1);
        assert_eq!(out.mode, TimerMode::ShortBreak);
        assert_eq!(out.duration_secs, 300);
    }

    #[test]
    fn every_fourth_work_earns_long_break() {
        let out = next_mode(TimerMode::Work, 3);
        assert_eq!(out.completed_pomodoros, 4);
        assert_eq!(out.mode, TimerMode::LongBreak);
        assert_eq!(out.duration_secs, 900);

        let out = next_mode(TimerMode::Work, 7);
        assert_eq!(out.completed_pomodoros, 8);
        assert_eq!(out.mode, TimerMode::LongBreak);
    }

    #[test]
    fn breaks_return_to_work_without_touching_count() {
        for brk in [TimerMode::ShortBreak, TimerMode::LongBreak] {
            let out = next_mode(brk, 6);
            assert_eq!(out.mode, TimerMode::Work);
            assert_eq!(out.duration_secs, 1500);
            assert_eq!(out.completed_pomodoros, 6);
        }
    }

    #[test]
    fn count_never_decreases() {
        let mut completed = 0;
        let mut mode = TimerMode::Work;
        for _ in 0..32 {
            let out = next_mode(mode, completed);
            assert!(out.completed_pomodoros >= completed);
            completed = out.completed_pomodoros;
            mode = out.mode;
        }
        // 32 transitions alternate Work and break, so 16 Work completions.
        assert_eq!(completed, 16);
    }
}
