//! # Pomotick
//!
//! Core library for a single-user Pomodoro timer: the countdown state
//! machine and its persistence contract. The crate is embedded in a UI
//! shell -- it has no CLI and no network surface. The shell renders
//! `progress`/`display_time`, owns the task list, and supplies the
//! notification and sound sinks; everything with an invariant lives here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure, tick-driven countdown state machine. The
//!   async [`TimerController`] arms the per-second scheduler, holds the
//!   deferred auto-start as a cancellable token, and broadcasts an
//!   [`Event`] for every state change.
//! - **Mode Cycle Policy**: pure decision function behind both natural
//!   completions and manual skips (work, short break, long break every
//!   fourth pomodoro).
//! - **Persistence Bridge**: snapshots the full state to a SQLite-backed
//!   key-value store after every mutation and restores it at startup,
//!   reconciling older snapshots with defaults. A restored timer is always
//!   stopped; resuming is opt-in via [`Config`].
//!
//! ## Key Components
//!
//! - [`TimerController`]: async owner of the engine
//! - [`TimerEngine`] / [`TimerState`]: the state machine and its snapshot
//! - [`PersistenceBridge`] / [`Database`]: durable store plumbing
//! - [`NotificationSink`] / [`SoundSink`]: swappable side-effect seams

pub mod error;
pub mod events;
pub mod sinks;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use sinks::{completion_message, NotificationSink, NullNotifier, NullSound, SoundSink};
pub use storage::{Config, Database, PersistenceBridge, Restored, StoreKind};
pub use task::{Task, TaskStore};
pub use timer::{
    next_mode, CycleOutcome, TickOutcome, TimerController, TimerEngine, TimerMode, TimerState,
};
