// file: src/models/settings.rs
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const USE_OUTLOOK_REMINDER: i32 = -1;
pub const MAX_FORCED_REMINDER_MINUTES: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Minutes before a meeting to remind, or -1 to keep Outlook's own reminder time
    #[serde(default = "default_forced_minutes")]
    pub forced_outlook_reminder_minutes: i32,
    /// Background reminder refresh, 0 disables it
    #[serde(default = "default_sync_interval")]
    pub outlook_sync_interval_minutes: u32,
}

fn default_forced_minutes() -> i32 {
    USE_OUTLOOK_REMINDER
}

fn default_sync_interval() -> u32 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            forced_outlook_reminder_minutes: default_forced_minutes(),
            outlook_sync_interval_minutes: default_sync_interval(),
        }
    }
}

impl Settings {
    pub fn reminder_override(&self) -> Option<Duration> {
        if self.forced_outlook_reminder_minutes < 0 {
            None
        } else {
            Some(Duration::minutes(self.forced_outlook_reminder_minutes as i64))
        }
    }

    pub fn sync_interval(&self) -> Option<std::time::Duration> {
        match self.outlook_sync_interval_minutes {
            0 => None,
            m => Some(std::time::Duration::from_secs(m as u64 * 60)),
        }
    }

    /// Clamps values into their accepted ranges.
    pub fn validated(mut self) -> Self {
        self.forced_outlook_reminder_minutes = self
            .forced_outlook_reminder_minutes
            .clamp(USE_OUTLOOK_REMINDER, MAX_FORCED_REMINDER_MINUTES);
        self
    }
}
