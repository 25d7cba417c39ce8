use chrono::{DateTime, Local};

use crate::alarm::model::Alarm;
use crate::alarm::snooze::SnoozeTracker;

/// The at-most-one currently-firing alarm: `idle -> firing -> idle`.
///
/// Opening while firing is a no-op, which is what guarantees the
/// single-firing invariant structurally instead of leaving it to whichever
/// surface happens to render the alert.
#[derive(Debug, Default)]
pub struct FiringSession {
    active: Option<Alarm>,
}

impl FiringSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_firing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Alarm> {
        self.active.as_ref()
    }

    /// Starts firing `alarm`. Returns false (dropping the alarm) when a
    /// session is already open.
    pub fn open(&mut self, alarm: Alarm) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(alarm);
        true
    }

    /// Closes the session with no further side effect. No-op when idle.
    pub fn dismiss(&mut self) -> Option<Alarm> {
        self.active.take()
    }

    /// Closes the session and records a snooze entry for the active alarm.
    /// No-op when idle.
    pub fn snooze(&mut self, tracker: &mut SnoozeTracker, now: DateTime<Local>) -> Option<Alarm> {
        let alarm = self.active.take()?;
        tracker.snooze(&alarm.id, now);
        Some(alarm)
    }
}
