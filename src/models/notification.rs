// file: src/models/notification.rs
use super::alarm::Alarm;
use super::reminder::OutlookReminder;
use chrono::{DateTime, Utc};

pub const ALARM_SOUND: &str = "alarm-clock-elapsed";

/// Everything needed to put a notification on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Existing notification to replace in place
    pub replaces_id: Option<u32>,
    pub summary: String,
    pub body: String,
    pub urgency_critical: bool,
    pub never_expire: bool,
    pub sound: Option<String>,
}

impl NotificationRequest {
    pub fn for_alarm(alarm: &Alarm) -> Self {
        Self {
            replaces_id: None,
            summary: alarm.notification_summary().to_string(),
            body: alarm.notification_body(),
            urgency_critical: true,
            never_expire: true,
            sound: Some(ALARM_SOUND.to_string()),
        }
    }

    pub fn for_reminder(reminder: &OutlookReminder, now: DateTime<Utc>) -> Self {
        Self {
            replaces_id: reminder.notification_id,
            summary: reminder.subject.clone(),
            body: reminder.notification_body(now),
            urgency_critical: true,
            never_expire: true,
            // Only the first popup rings, updates are silent
            sound: reminder
                .notification_id
                .is_none()
                .then(|| ALARM_SOUND.to_string()),
        }
    }
}
