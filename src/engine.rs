use chrono::{DateTime, Local};
use log::info;

use crate::alarm::matcher;
use crate::alarm::model::Alarm;
use crate::alarm::projector::{self, NextAlarm};
use crate::alarm::session::FiringSession;
use crate::alarm::snooze::SnoozeTracker;
use crate::alarm::store::AlarmStore;

/// Owns the alarm state and drives one matching pass per clock tick.
///
/// All mutation happens synchronously inside `tick` or a user-action method,
/// so within a tick the matcher always sees a consistent snapshot of the
/// store and the snooze tracker.
pub struct ClockEngine {
    store: AlarmStore,
    snooze: SnoozeTracker,
    session: FiringSession,
}

impl ClockEngine {
    pub fn new(store: AlarmStore) -> Self {
        Self {
            store,
            snooze: SnoozeTracker::new(),
            session: FiringSession::new(),
        }
    }

    pub fn store(&self) -> &AlarmStore {
        &self.store
    }

    pub fn firing(&self) -> Option<&Alarm> {
        self.session.active()
    }

    /// One clock tick. While a session is open, later matches are dropped,
    /// not queued. Returns the alarm that begins firing on this tick, if any.
    pub fn tick(&mut self, now: DateTime<Local>) -> Option<Alarm> {
        self.snooze.purge_expired(now);
        if self.session.is_firing() {
            return None;
        }
        let matched = matcher::first_match(self.store.alarms(), &self.snooze, now)?.clone();
        info!(
            "alarm {} ({}) firing at {}",
            matched.id,
            matched.label,
            now.format("%H:%M:%S")
        );
        self.session.open(matched.clone());
        Some(matched)
    }

    /// Closes the firing session, if one is open.
    pub fn dismiss(&mut self) -> Option<Alarm> {
        self.session.dismiss()
    }

    /// Closes the firing session and suppresses its alarm for five minutes.
    pub fn snooze(&mut self, now: DateTime<Local>) -> Option<Alarm> {
        self.session.snooze(&mut self.snooze, now)
    }

    pub fn next_alarm(&self, now: DateTime<Local>) -> Option<NextAlarm<'_>> {
        projector::project(self.store.alarms(), now)
    }
}
