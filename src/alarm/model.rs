use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A wall-clock hour/minute pair. Serializes as the zero-padded "HH:MM"
/// string the persisted format uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u32,
    minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlarmTimeParseError {
    #[error("expected HH:MM, got '{0}'")]
    Format(String),
    #[error("hour {0} out of range 00-23")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range 00-59")]
    MinuteOutOfRange(u32),
}

impl AlarmTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, AlarmTimeParseError> {
        if hour > 23 {
            return Err(AlarmTimeParseError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(AlarmTimeParseError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn minutes_from_midnight(&self) -> i64 {
        i64::from(self.hour * 60 + self.minute)
    }

    /// True when `now` falls in this alarm's minute. The seconds component is
    /// checked by the matcher, not here.
    pub fn matches_minute(&self, now: &DateTime<Local>) -> bool {
        now.hour() == self.hour && now.minute() == self.minute
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = AlarmTimeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some((hour_text, minute_text)) = input.split_once(':') else {
            return Err(AlarmTimeParseError::Format(input.to_string()));
        };
        let hour = hour_text
            .parse::<u32>()
            .map_err(|_| AlarmTimeParseError::Format(input.to_string()))?;
        let minute = minute_text
            .parse::<u32>()
            .map_err(|_| AlarmTimeParseError::Format(input.to_string()))?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = AlarmTimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmTime> for String {
    fn from(value: AlarmTime) -> Self {
        value.to_string()
    }
}

/// A user-defined time-of-day trigger.
///
/// `days` carries weekday numbers (0 = Sunday .. 6 = Saturday) so persisted
/// data round-trips, but matching ignores it; alarms fire every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub time: AlarmTime,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub days: Vec<u8>,
}

impl Alarm {
    /// Builds a fresh alarm. The id is the creation timestamp in
    /// milliseconds; uniqueness relies on callers being spaced apart in time,
    /// which holds for interactive use but is not collision-proof.
    pub fn new(time: AlarmTime, label: &str, now: DateTime<Local>) -> Self {
        let label = label.trim();
        Self {
            id: now.timestamp_millis().to_string(),
            time,
            label: if label.is_empty() {
                default_label()
            } else {
                label.to_string()
            },
            enabled: true,
            days: Vec::new(),
        }
    }
}

fn default_label() -> String {
    "Alarm".to_string()
}

fn default_enabled() -> bool {
    true
}

pub fn parse_alarm_list(content: &str) -> Result<Vec<Alarm>> {
    let alarms = serde_json::from_str::<Vec<Alarm>>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    let mut ids = HashSet::new();
    for alarm in &alarms {
        if !ids.insert(alarm.id.as_str()) {
            bail!("duplicate alarm id found: {}", alarm.id);
        }
    }
    Ok(alarms)
}

pub fn serialize_alarm_list(alarms: &[Alarm]) -> Result<String> {
    Ok(serde_json::to_string(alarms)?)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 8, 30, 12, 0, 0)
            .single()
            .expect("valid datetime")
    }

    #[test]
    fn parses_valid_alarm_list() {
        let json = r#"
[
  {
    "id": "1756500000000",
    "time": "07:00",
    "label": "Wake up",
    "enabled": true,
    "days": []
  },
  {
    "id": "1756500000001",
    "time": "22:15",
    "enabled": false,
    "days": [1, 2, 3, 4, 5]
  }
]
"#;
        let alarms = parse_alarm_list(json).expect("valid list");
        assert_eq!(alarms.len(), 2);
        assert_eq!(alarms[0].label, "Wake up");
        assert_eq!(alarms[0].time.to_string(), "07:00");
        assert_eq!(alarms[1].label, "Alarm");
        assert!(!alarms[1].enabled);
        assert_eq!(alarms[1].days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rejects_invalid_time_string() {
        let json = r#"[{"id": "1", "time": "25:99"}]"#;
        let err = parse_alarm_list(json).expect_err("invalid time should fail");
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"[{"id": "dup", "time": "07:00"}, {"id": "dup", "time": "08:00"}]"#;
        let err = parse_alarm_list(json).expect_err("duplicate ids should fail");
        assert!(err.to_string().contains("duplicate alarm id"));
    }

    #[test]
    fn serialization_round_trips_in_order() {
        let first = Alarm::new("07:00".parse().expect("time"), "First", sample_now());
        let mut second = Alarm::new("06:30".parse().expect("time"), "Second", sample_now());
        second.id = "other".to_string();
        second.enabled = false;
        second.days = vec![0, 6];
        let alarms = vec![first, second];

        let text = serialize_alarm_list(&alarms).expect("serialize");
        let restored = parse_alarm_list(&text).expect("parse back");
        assert_eq!(restored, alarms);
    }

    #[test]
    fn empty_label_defaults_to_alarm() {
        let alarm = Alarm::new("07:00".parse().expect("time"), "   ", sample_now());
        assert_eq!(alarm.label, "Alarm");
        assert!(alarm.enabled);
        assert!(alarm.days.is_empty());
    }

    #[test]
    fn id_is_creation_timestamp_millis() {
        let now = sample_now();
        let alarm = Alarm::new("07:00".parse().expect("time"), "x", now);
        assert_eq!(alarm.id, now.timestamp_millis().to_string());
    }

    #[test]
    fn time_display_is_zero_padded() {
        let time = AlarmTime::new(6, 5).expect("valid");
        assert_eq!(time.to_string(), "06:05");
    }

    #[test]
    fn time_parse_rejects_out_of_range() {
        assert_eq!(
            "24:00".parse::<AlarmTime>(),
            Err(AlarmTimeParseError::HourOutOfRange(24))
        );
        assert_eq!(
            "12:60".parse::<AlarmTime>(),
            Err(AlarmTimeParseError::MinuteOutOfRange(60))
        );
        assert!(matches!(
            "0700".parse::<AlarmTime>(),
            Err(AlarmTimeParseError::Format(_))
        ));
    }
}
