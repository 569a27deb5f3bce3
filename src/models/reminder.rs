// file: src/models/reminder.rs
use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

/// A meeting reminder imported from Outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookReminder {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub location: String,
    /// When Outlook wants the reminder to pop up
    pub reminder_time: DateTime<Utc>,
    #[serde(rename = "startDate")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
    /// Desktop notification currently showing this reminder
    #[serde(skip)]
    pub notification_id: Option<u32>,
}

impl OutlookReminder {
    /// Reminder time, or `start - lead` when the user forces a lead time.
    pub fn effective_reminder_time(&self, forced_lead: Option<Duration>) -> DateTime<Utc> {
        match forced_lead {
            Some(lead) => self.start - lead,
            None => self.reminder_time,
        }
    }

    /// Whole minutes until the meeting starts, rounded up.
    pub fn minutes_until_start(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.start - now).num_milliseconds();
        (millis as f64 / 60_000.0).ceil() as i64
    }

    pub fn countdown_text(&self, now: DateTime<Utc>) -> String {
        match self.minutes_until_start(now) {
            m if m <= 0 => "Now".to_string(),
            1 => "In less than a minute".to_string(),
            m => format!("In {} minutes", m),
        }
    }

    pub fn notification_body(&self, now: DateTime<Utc>) -> String {
        let start = self.start.with_timezone(&Local).format("%H:%M:%S");
        let end = self.end.with_timezone(&Local).format("%H:%M:%S");
        let span = if self.location.trim().is_empty() {
            format!("at {} - {}", start, end)
        } else {
            format!("{}, at {} - {}", self.location, start, end)
        };
        format!("{}\n{}", self.countdown_text(now), span)
    }
}
