#![allow(unused_imports)]
// file: src/models/mod.rs

pub mod alarm;
pub mod notification;
pub mod reminder;
pub mod repeat;
pub mod settings;
pub mod sync;

pub use alarm::{parse_alarm_time, Alarm, TIME_FORMAT};
pub use notification::{NotificationRequest, ALARM_SOUND};
pub use reminder::OutlookReminder;
pub use repeat::{weekday_from_index, RepeatDays, RepeatPreset, DAY_ABBREVIATIONS};
pub use settings::{Settings, MAX_FORCED_REMINDER_MINUTES, USE_OUTLOOK_REMINDER};
pub use sync::SyncResult;
