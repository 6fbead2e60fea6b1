//! Async owner of the timer engine.
//!
//! The controller serializes every mutation through one mutex, arms the
//! per-second scheduler as a spawned ticker task, and holds the deferred
//! auto-start as an explicit cancellation token (a stored `JoinHandle`).
//! Any explicit operation -- start, stop, reset, skip -- aborts a pending
//! deferred start before it touches the engine, so the latest user intent
//! wins over a suspended continuation.
//!
//! Observers subscribe to a broadcast stream of [`Event`]s; the
//! notification and sound sinks are driven from completions here rather
//! than from inside the state machine.
//!
//! The two handle slots are plain mutexes, locked only for a
//! take-and-replace and never across an await; the engine itself sits
//! behind the async mutex. Where both are touched, slots are handled
//! before the engine.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time;

use crate::events::Event;
use crate::sinks::{completion_message, NotificationSink, SoundSink};
use crate::storage::{Config, PersistenceBridge};

use super::engine::{TickOutcome, TimerEngine};
use super::mode::TimerMode;
use super::state::TimerState;

/// Cadence of the countdown scheduler.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Pause between an auto-cycle completion and the automatic restart.
pub const AUTO_START_DELAY: Duration = Duration::from_secs(3);

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Drives a [`TimerEngine`] on the tokio clock and persists every change.
#[derive(Clone)]
pub struct TimerController {
    engine: Arc<Mutex<TimerEngine>>,
    bridge: PersistenceBridge,
    config: Arc<Config>,
    notifier: Arc<dyn NotificationSink>,
    sound: Arc<dyn SoundSink>,
    events: broadcast::Sender<Event>,
    pending_resume: Arc<StdMutex<Option<JoinHandle<()>>>>,
    ticker: Arc<StdMutex<Option<JoinHandle<()>>>>,
    was_running: bool,
}

impl TimerController {
    /// Restore state through the bridge and build a stopped controller.
    ///
    /// The countdown never resumes implicitly; call [`restore_autostart`]
    /// to honor the `[restore] auto_resume` configuration.
    ///
    /// [`restore_autostart`]: TimerController::restore_autostart
    pub fn new(
        bridge: PersistenceBridge,
        config: Config,
        notifier: Arc<dyn NotificationSink>,
        sound: Arc<dyn SoundSink>,
    ) -> Self {
        let restored = bridge.load();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new(restored.state))),
            bridge,
            config: Arc::new(config),
            notifier,
            sound,
            events,
            pending_resume: Arc::new(StdMutex::new(None)),
            ticker: Arc::new(StdMutex::new(None)),
            was_running: restored.was_running,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn state(&self) -> TimerState {
        self.engine.lock().await.state().clone()
    }

    /// Full state snapshot event, for shells that poll instead of subscribe.
    pub async fn snapshot(&self) -> Event {
        self.engine.lock().await.snapshot()
    }

    /// Whether the persisted snapshot was running when it was written.
    pub fn was_running(&self) -> bool {
        self.was_running
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the countdown. Safe to call redundantly; a pending deferred
    /// auto-start is superseded.
    pub async fn start(&self) {
        self.cancel_pending_resume();
        let (event, state) = {
            let mut engine = self.engine.lock().await;
            let event = engine.start();
            (event, engine.state().clone())
        };
        if let Some(event) = event {
            self.arm_ticker();
            self.emit(event);
            self.bridge.save_async(state);
        }
    }

    /// Disarm the countdown and cancel any pending deferred auto-start.
    pub async fn stop(&self) {
        self.cancel_pending_resume();
        self.cancel_ticker();
        let (event, state) = {
            let mut engine = self.engine.lock().await;
            let event = engine.stop();
            (event, engine.state().clone())
        };
        if let Some(event) = event {
            self.emit(event);
            self.bridge.save_async(state);
        }
    }

    /// Stop and rewind the current interval.
    pub async fn reset(&self) {
        self.cancel_pending_resume();
        self.cancel_ticker();
        let (event, state) = {
            let mut engine = self.engine.lock().await;
            (engine.reset(), engine.state().clone())
        };
        self.emit(event);
        self.bridge.save_async(state);
    }

    /// Stop and advance through the cycle without completion side effects.
    pub async fn skip_to_next(&self) {
        self.cancel_pending_resume();
        self.cancel_ticker();
        let (event, state) = {
            let mut engine = self.engine.lock().await;
            (engine.skip_to_next(), engine.state().clone())
        };
        self.emit(event);
        self.bridge.save_async(state);
    }

    pub async fn set_session_goal(&self, goal: u32) {
        self.apply_setting(|engine| engine.set_session_goal(goal)).await;
    }

    pub async fn set_sound_enabled(&self, enabled: bool) {
        self.apply_setting(|engine| engine.set_sound_enabled(enabled))
            .await;
    }

    pub async fn set_auto_cycle_enabled(&self, enabled: bool) {
        self.apply_setting(|engine| engine.set_auto_cycle_enabled(enabled))
            .await;
    }

    pub async fn set_active_task_id(&self, id: Option<i64>) {
        self.apply_setting(|engine| engine.set_active_task_id(id)).await;
    }

    /// Start the countdown iff the loaded snapshot was running and the
    /// configuration opts into resuming it. Returns whether it started.
    pub async fn restore_autostart(&self) -> bool {
        if self.was_running && self.config.restore.auto_resume {
            self.start().await;
            true
        } else {
            false
        }
    }

    /// Graceful-exit path: persist the pre-shutdown state (including the
    /// running flag, so a later restore can offer to resume), then cancel
    /// the scheduler and any deferred start. The write happens on the
    /// calling task; failures are logged, never raised.
    pub async fn shutdown(&self) {
        let state = self.engine.lock().await.state().clone();
        self.cancel_pending_resume();
        self.cancel_ticker();
        self.engine.lock().await.stop();
        if let Err(e) = self.bridge.save_blocking(&state) {
            log::warn!("exit snapshot write failed: {e}");
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn apply_setting(&self, apply: impl FnOnce(&mut TimerEngine)) {
        let (snapshot, state) = {
            let mut engine = self.engine.lock().await;
            apply(&mut engine);
            (engine.snapshot(), engine.state().clone())
        };
        self.emit(snapshot);
        self.bridge.save_async(state);
    }

    fn arm_ticker(&self) {
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(TICK_INTERVAL);
            // The first interval tick completes immediately; consume it so
            // the countdown only moves on whole elapsed seconds.
            interval.tick().await;
            loop {
                interval.tick().await;
                let (outcome, state) = {
                    let mut engine = controller.engine.lock().await;
                    let outcome = engine.tick();
                    (outcome, engine.state().clone())
                };
                match outcome {
                    TickOutcome::Idle => break,
                    TickOutcome::Ticked(event) => {
                        controller.emit(event);
                        controller.bridge.save_async(state);
                    }
                    TickOutcome::Completed {
                        ended_mode,
                        auto_cycled,
                        events,
                    } => {
                        for event in events {
                            controller.emit(event);
                        }
                        controller.dispatch_completion_effects(ended_mode, state.sound_enabled);
                        controller.bridge.save_async(state);
                        if auto_cycled {
                            controller.arm_auto_resume();
                        }
                        break;
                    }
                }
            }
        });
        if let Some(old) = self.store_handle(&self.ticker, handle) {
            old.abort();
        }
    }

    /// Schedule the delayed restart that follows an auto-cycle completion.
    /// The stored handle is the cancellation token every explicit operation
    /// aborts first.
    fn arm_auto_resume(&self) {
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            time::sleep(AUTO_START_DELAY).await;
            // Drop our own token before starting so start()'s cancellation
            // pass does not abort the task performing it.
            controller.take_handle(&controller.pending_resume);
            controller.start().await;
        });
        if let Some(old) = self.store_handle(&self.pending_resume, handle) {
            old.abort();
        }
    }

    fn cancel_pending_resume(&self) {
        if let Some(handle) = self.take_handle(&self.pending_resume) {
            handle.abort();
        }
    }

    fn cancel_ticker(&self) {
        if let Some(handle) = self.take_handle(&self.ticker) {
            handle.abort();
        }
    }

    fn store_handle(
        &self,
        slot: &StdMutex<Option<JoinHandle<()>>>,
        handle: JoinHandle<()>,
    ) -> Option<JoinHandle<()>> {
        slot.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle)
    }

    fn take_handle(&self, slot: &StdMutex<Option<JoinHandle<()>>>) -> Option<JoinHandle<()>> {
        slot.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    fn dispatch_completion_effects(&self, ended: TimerMode, sound_enabled: bool) {
        if sound_enabled {
            self.sound.play_alarm(self.config.alarm_volume());
        }
        if self.config.notifications.enabled {
            let (title, body) = completion_message(ended);
            self.notifier.notify(title, body);
        }
    }

    fn emit(&self, event: Event) {
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(event);
    }
}
