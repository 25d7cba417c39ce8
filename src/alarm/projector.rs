use chrono::{DateTime, Local, Timelike};

use crate::alarm::model::Alarm;

#[derive(Debug)]
pub struct NextAlarm<'a> {
    pub alarm: &'a Alarm,
    /// Whole minutes until the alarm is next due, always in 1..=1440. An
    /// alarm set for the current minute projects a full day ahead.
    pub minutes_until: i64,
}

/// Finds the enabled alarm that is due soonest, comparing minute-of-day
/// distances and rolling past times over to tomorrow. Ties go to the first
/// alarm in store order. Returns `None` when no alarm is enabled.
pub fn project<'a>(alarms: &'a [Alarm], now: DateTime<Local>) -> Option<NextAlarm<'a>> {
    let now_minutes = i64::from(now.hour() * 60 + now.minute());
    let mut closest: Option<NextAlarm<'a>> = None;

    for alarm in alarms.iter().filter(|alarm| alarm.enabled) {
        let mut diff = alarm.time.minutes_from_midnight() - now_minutes;
        if diff <= 0 {
            diff += 24 * 60;
        }
        if closest
            .as_ref()
            .is_none_or(|best| diff < best.minutes_until)
        {
            closest = Some(NextAlarm {
                alarm,
                minutes_until: diff,
            });
        }
    }

    closest
}
