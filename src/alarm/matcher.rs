use chrono::{DateTime, Local, Timelike};

use crate::alarm::model::Alarm;
use crate::alarm::snooze::SnoozeTracker;

/// Returns the first alarm in store order that should begin firing at `now`:
/// enabled, hour/minute equal to now's, `now.second() == 0`, and not
/// suppressed by an active snooze.
///
/// The exact `:00` gate means a tick that lands late in the minute (for
/// example after a scheduler stall) misses that minute's firing entirely.
/// That is deliberate; widening the gate to a tolerance window would change
/// matching semantics.
pub fn first_match<'a>(
    alarms: &'a [Alarm],
    snooze: &SnoozeTracker,
    now: DateTime<Local>,
) -> Option<&'a Alarm> {
    if now.second() != 0 {
        return None;
    }
    alarms.iter().find(|alarm| {
        alarm.enabled && alarm.time.matches_minute(&now) && !snooze.is_suppressed(&alarm.id, now)
    })
}
