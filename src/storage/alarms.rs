// file: src/storage/alarms.rs
use chrono::{Datelike, NaiveDateTime};
use uuid::Uuid;

use crate::config::APP_DISPLAY_NAME;
use crate::models::Alarm;

pub fn sorted(alarms: &[Alarm]) -> Vec<Alarm> {
    let mut alarms = alarms.to_vec();
    alarms.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.name.cmp(&b.name)));
    alarms
}

/// Replaces the alarm with the same id, or appends it.
pub fn upsert(alarms: &mut Vec<Alarm>, alarm: Alarm) {
    match alarms.iter_mut().find(|a| a.id == alarm.id) {
        Some(existing) => *existing = alarm,
        None => alarms.push(alarm),
    }
}

pub fn remove(alarms: &mut Vec<Alarm>, id: Uuid) -> bool {
    let before = alarms.len();
    alarms.retain(|a| a.id != id);
    alarms.len() != before
}

pub fn set_enabled(alarms: &mut [Alarm], id: Uuid, enabled: bool) -> bool {
    match alarms.iter_mut().find(|a| a.id == id) {
        Some(alarm) => {
            alarm.enabled = enabled;
            true
        }
        None => false,
    }
}

/// Earliest enabled alarm that will still ring today.
pub fn next_due(alarms: &[Alarm], now: NaiveDateTime) -> Option<&Alarm> {
    let today = now.weekday();
    alarms
        .iter()
        .filter(|a| a.enabled && a.repeat.fires_on(today) && a.time > now.time())
        .min_by_key(|a| a.time)
}

pub fn tooltip(next: Option<&Alarm>) -> String {
    match next {
        Some(alarm) => format!("Next alarm: {} at {}", alarm.display_name(), alarm.time_text()),
        None => APP_DISPLAY_NAME.to_string(),
    }
}
