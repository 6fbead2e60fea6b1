mod controller;
mod cycle;
mod engine;
mod mode;
mod state;

pub use controller::{TimerController, AUTO_START_DELAY, TICK_INTERVAL};
pub use cycle::{next_mode, CycleOutcome, POMODOROS_PER_LONG_BREAK};
pub use engine::{TickOutcome, TimerEngine};
pub use mode::{TimerMode, LONG_BREAK_SECS, SHORT_BREAK_SECS, WORK_SECS};
pub use state::{TimerState, SESSION_GOAL_MAX, SESSION_GOAL_MIN};
