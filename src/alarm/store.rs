use anyhow::Result;
use chrono::{DateTime, Local};
use log::warn;

use crate::alarm::model::{self, Alarm, AlarmTime};
use crate::storage::{ALARMS_KEY, KvStore};

/// The ordered set of alarm records. Every mutation writes the full
/// serialized set through the key-value collaborator before returning.
pub struct AlarmStore {
    storage: Box<dyn KvStore>,
    alarms: Vec<Alarm>,
}

impl AlarmStore {
    /// Reads the persisted alarm list once. Absent or malformed data fails
    /// soft to an empty set; stale persisted state is recoverable, never
    /// fatal.
    pub fn load(storage: Box<dyn KvStore>) -> Self {
        let alarms = match storage.get(ALARMS_KEY) {
            None => Vec::new(),
            Some(raw) => match model::parse_alarm_list(&raw) {
                Ok(alarms) => alarms,
                Err(err) => {
                    warn!("ignoring malformed alarm data: {err:#}");
                    Vec::new()
                }
            },
        };
        Self { storage, alarms }
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    /// Appends a fresh enabled alarm and persists.
    pub fn create(&mut self, time: AlarmTime, label: &str, now: DateTime<Local>) -> Result<Alarm> {
        let alarm = Alarm::new(time, label, now);
        self.alarms.push(alarm.clone());
        self.persist()?;
        Ok(alarm)
    }

    /// Flips the enabled flag. Returns false without persisting when the id
    /// is unknown.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let Some(alarm) = self.alarms.iter_mut().find(|alarm| alarm.id == id) else {
            return Ok(false);
        };
        alarm.enabled = !alarm.enabled;
        self.persist()?;
        Ok(true)
    }

    /// Removes the alarm with `id`. Returns false without persisting when
    /// the id is unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.alarms.len();
        self.alarms.retain(|alarm| alarm.id != id);
        if self.alarms.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> Result<()> {
        let payload = model::serialize_alarm_list(&self.alarms)?;
        self.storage.set(ALARMS_KEY, &payload)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::storage::MemoryKvStore;

    fn at_millis(offset_ms: i64) -> DateTime<Local> {
        Local
            .timestamp_millis_opt(1_756_500_000_000 + offset_ms)
            .single()
            .expect("valid timestamp")
    }

    fn time(text: &str) -> AlarmTime {
        text.parse().expect("valid time")
    }

    #[test]
    fn starts_empty_when_nothing_persisted() {
        let store = AlarmStore::load(Box::new(MemoryKvStore::default()));
        assert!(store.alarms().is_empty());
    }

    #[test]
    fn malformed_persisted_data_fails_soft_to_empty() {
        let mut kv = MemoryKvStore::default();
        kv.set(ALARMS_KEY, "{ not-valid-json ").expect("seed");

        let store = AlarmStore::load(Box::new(kv));
        assert!(store.alarms().is_empty());
    }

    #[test]
    fn create_assigns_id_and_writes_through() {
        let kv = MemoryKvStore::default();
        let mut store = AlarmStore::load(Box::new(kv.clone()));

        let alarm = store
            .create(time("07:00"), "Wake up", at_millis(0))
            .expect("create");
        assert!(alarm.enabled);
        assert_eq!(store.alarms().len(), 1);

        let written = kv.get(ALARMS_KEY).expect("written through");
        assert!(written.contains("07:00"));
        assert!(written.contains(&alarm.id));
    }

    #[test]
    fn mutations_survive_a_reload() {
        let kv = MemoryKvStore::default();
        let mut store = AlarmStore::load(Box::new(kv.clone()));
        let first = store
            .create(time("07:00"), "First", at_millis(0))
            .expect("create");
        store
            .create(time("08:30"), "Second", at_millis(1))
            .expect("create");
        store.toggle(&first.id).expect("toggle");

        let reloaded = AlarmStore::load(Box::new(kv));
        assert_eq!(reloaded.alarms().len(), 2);
        assert_eq!(reloaded.alarms()[0].label, "First");
        assert!(!reloaded.alarms()[0].enabled);
        assert_eq!(reloaded.alarms()[1].label, "Second");
    }

    #[test]
    fn toggle_unknown_id_is_a_noop() {
        let kv = MemoryKvStore::default();
        let mut store = AlarmStore::load(Box::new(kv.clone()));

        assert!(!store.toggle("missing").expect("toggle"));
        assert_eq!(kv.get(ALARMS_KEY), None);
    }

    #[test]
    fn delete_removes_only_the_named_alarm() {
        let kv = MemoryKvStore::default();
        let mut store = AlarmStore::load(Box::new(kv.clone()));
        let first = store
            .create(time("07:00"), "First", at_millis(0))
            .expect("create");
        store
            .create(time("08:30"), "Second", at_millis(1))
            .expect("create");

        assert!(store.delete(&first.id).expect("delete"));
        assert_eq!(store.alarms().len(), 1);
        assert_eq!(store.alarms()[0].label, "Second");
        assert!(!store.delete(&first.id).expect("second delete is a no-op"));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut store = AlarmStore::load(Box::new(MemoryKvStore::default()));
        for (index, text) in ["09:00", "06:00", "12:45"].iter().enumerate() {
            store
                .create(time(text), &format!("a{index}"), at_millis(index as i64))
                .expect("create");
        }

        let labels: Vec<_> = store.alarms().iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["a0", "a1", "a2"]);
    }
}
