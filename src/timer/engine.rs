//! Countdown state machine.
//!
//! The engine is pure: it owns a [`TimerState`], mutates it through the
//! operations below, and reports every change as an [`Event`]. It never
//! spawns tasks, touches the clock scheduler, or performs IO -- the
//! [`TimerController`](super::TimerController) does that, which keeps the
//! machine testable with nothing but method calls.
//!
//! ## Tick contract
//!
//! `tick()` is called once per wall-clock second while running. With
//! `time_left > 1` it decrements; at exactly 1 it decrements to zero, stops,
//! and reports the completion. A completion is reported at most once per
//! interval.

use chrono::Utc;

use crate::events::Event;

use super::cycle::next_mode;
use super::mode::TimerMode;
use super::state::TimerState;

/// Core timer state machine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
}

/// What a single tick did.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Not running; nothing happened.
    Idle,
    /// One second consumed.
    Ticked(Event),
    /// The interval finished. `auto_cycled` is true when the mode cycle
    /// policy was applied (and a deferred restart should be scheduled).
    Completed {
        ended_mode: TimerMode,
        auto_cycled: bool,
        events: Vec<Event>,
    },
}

impl TimerEngine {
    pub fn new(state: TimerState) -> Self {
        Self { state }
    }

    pub fn with_defaults() -> Self {
        Self::new(TimerState::default())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let s = &self.state;
        Event::StateSnapshot {
            mode: s.mode,
            time_left: s.time_left,
            is_running: s.is_running,
            completed_pomodoros: s.completed_pomodoros,
            session_goal: s.session_goal,
            sound_enabled: s.sound_enabled,
            auto_cycle_enabled: s.auto_cycle_enabled,
            active_task_id: s.active_task_id,
            progress: s.progress(),
            display_time: s.display_time(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Mark the countdown running. `None` if it already was.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        Some(Event::TimerStarted {
            mode: self.state.mode,
            time_left: self.state.time_left,
            at: Utc::now(),
        })
    }

    /// Mark the countdown stopped. `None` if it already was.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerStopped {
            time_left: self.state.time_left,
            at: Utc::now(),
        })
    }

    /// Stop and rewind the current interval. Mode, count and settings are
    /// untouched.
    pub fn reset(&mut self) -> Event {
        self.state.is_running = false;
        self.state.time_left = self.state.mode.duration_secs();
        Event::TimerReset {
            mode: self.state.mode,
            time_left: self.state.time_left,
            at: Utc::now(),
        }
    }

    /// Stop and advance through the cycle without completion side effects.
    pub fn skip_to_next(&mut self) -> Event {
        self.state.is_running = false;
        let from = self.state.mode;
        let out = next_mode(from, self.state.completed_pomodoros);
        self.state.mode = out.mode;
        self.state.time_left = out.duration_secs;
        self.state.completed_pomodoros = out.completed_pomodoros;
        Event::TimerSkipped {
            from_mode: from,
            to_mode: out.mode,
            completed_pomodoros: out.completed_pomodoros,
            at: Utc::now(),
        }
    }

    /// Clamps out-of-range goals instead of rejecting them.
    pub fn set_session_goal(&mut self, goal: u32) {
        self.state.session_goal = TimerState::clamp_session_goal(goal);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.state.sound_enabled = enabled;
    }

    pub fn set_auto_cycle_enabled(&mut self, enabled: bool) {
        self.state.auto_cycle_enabled = enabled;
    }

    pub fn set_active_task_id(&mut self, id: Option<i64>) {
        self.state.active_task_id = id;
    }

    /// Consume one second of the current interval.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Idle;
        }
        match self.state.time_left {
            0 => {
                // Completion already fired for this interval; just disarm.
                self.state.is_running = false;
                TickOutcome::Idle
            }
            1 => {
                self.state.time_left = 0;
                self.state.is_running = false;
                self.complete()
            }
            _ => {
                self.state.time_left -= 1;
                TickOutcome::Ticked(Event::Tick {
                    mode: self.state.mode,
                    time_left: self.state.time_left,
                    at: Utc::now(),
                })
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> TickOutcome {
        let ended_mode = self.state.mode;
        let mut events = vec![Event::IntervalCompleted {
            mode: ended_mode,
            at: Utc::now(),
        }];
        let auto_cycled = self.state.auto_cycle_enabled;
        if auto_cycled {
            let out = next_mode(ended_mode, self.state.completed_pomodoros);
            self.state.mode = out.mode;
            self.state.time_left = out.duration_secs;
            self.state.completed_pomodoros = out.completed_pomodoros;
            events.push(Event::ModeAdvanced {
                mode: out.mode,
                time_left: out.duration_secs,
                completed_pomodoros: out.completed_pomodoros,
                at: Utc::now(),
            });
        }
        TickOutcome::Completed {
            ended_mode,
            auto_cycled,
            events,
        }
    }
}
