use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};

pub const SNOOZE_MINUTES: i64 = 5;

/// Tracks which alarms are temporarily excluded from matching because the
/// user snoozed them. Suppression holds while `now <= expiry` and lifts
/// strictly after the expiry instant.
#[derive(Debug, Default)]
pub struct SnoozeTracker {
    entries: HashMap<String, DateTime<Local>>,
}

impl SnoozeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a snooze for `id` expiring five minutes after `now`,
    /// overwriting any prior entry.
    pub fn snooze(&mut self, id: &str, now: DateTime<Local>) {
        self.entries
            .insert(id.to_string(), now + Duration::minutes(SNOOZE_MINUTES));
    }

    pub fn is_suppressed(&self, id: &str, now: DateTime<Local>) -> bool {
        self.entries.get(id).is_some_and(|expiry| now <= *expiry)
    }

    /// Drops expired entries. Stale entries are inert, so this is purely a
    /// bookkeeping pass and has no observable effect on matching.
    pub fn purge_expired(&mut self, now: DateTime<Local>) {
        self.entries.retain(|_, expiry| now <= *expiry);
    }
}
