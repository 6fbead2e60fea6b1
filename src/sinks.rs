//! Side-effect sinks.
//!
//! Notification and sound are fire-and-forget collaborators: the controller
//! invokes them exactly once per natural completion and never waits on or
//! learns about their failures. Implementations own their platform plumbing
//! (and their error swallowing); the null sinks below are for headless use.

use crate::timer::TimerMode;

/// Platform notification surface. Permission gating is the implementation's
/// problem; the core never observes an outcome.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Alarm sound surface. `volume` is `0.0..=1.0`.
pub trait SoundSink: Send + Sync {
    fn play_alarm(&self, volume: f32);
}

/// Drops notifications, logging at debug for test visibility.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn notify(&self, title: &str, body: &str) {
        log::debug!("notification suppressed: {title} - {body}");
    }
}

/// Drops alarm requests.
#[derive(Debug, Default)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn play_alarm(&self, volume: f32) {
        log::debug!("alarm suppressed (volume {volume})");
    }
}

/// The fixed title/body pair announced when an interval of `ended` finishes.
pub fn completion_message(ended: TimerMode) -> (&'static str, &'static str) {
    match ended {
        TimerMode::Work => ("Pomodoro Complete!", "Great work! Time for a break."),
        TimerMode::ShortBreak => ("Break Over", "Back to focus."),
        TimerMode::LongBreak => ("Long Break Over", "Ready for the next round?"),
    }
}
