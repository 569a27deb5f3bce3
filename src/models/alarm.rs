// file: src/models/alarm.rs
use super::repeat::RepeatDays;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    /// Identity for the running session only, not persisted
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repeat: RepeatDays,
    #[serde(with = "alarm_time")]
    pub time: NaiveTime,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            repeat: RepeatDays::once(),
            time: NaiveTime::MIN,
            enabled: true,
        }
    }
}

impl Alarm {
    pub fn new(name: impl Into<String>, time: NaiveTime, repeat: RepeatDays) -> Self {
        Self {
            name: name.into(),
            time: truncate_to_seconds(time),
            repeat,
            ..Self::default()
        }
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.trim().is_empty()
    }

    pub fn display_name(&self) -> &str {
        if self.is_unnamed() {
            "Untitled alarm"
        } else {
            &self.name
        }
    }

    pub fn notification_summary(&self) -> &str {
        if self.is_unnamed() {
            "Alarm"
        } else {
            &self.name
        }
    }

    pub fn notification_body(&self) -> String {
        let time = self.time.format(TIME_FORMAT);
        if self.is_unnamed() {
            format!("It's {}, your alarm is going off!", time)
        } else {
            format!("It's {}, your alarm {} is going off!", time, self.name)
        }
    }

    pub fn time_text(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    pub fn schedule_text(&self) -> String {
        format!("{} {}", self.time_text(), self.repeat.summary())
    }

    pub fn is_once(&self) -> bool {
        self.repeat.is_once()
    }
}

pub fn truncate_to_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Accepts `HH:MM:SS` or `HH:MM`.
pub fn parse_alarm_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .ok()
}

mod alarm_time {
    use super::{parse_alarm_time, truncate_to_seconds, TIME_FORMAT};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_alarm_time(&raw)
            .or_else(|| NaiveTime::parse_from_str(&raw, "%H:%M:%S%.f").ok())
            .map(truncate_to_seconds)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid alarm time '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn seven_thirty() -> NaiveTime {
        NaiveTime::from_hms_opt(7, 30, 0).unwrap()
    }

    #[test]
    fn test_display_name_and_summary() {
        let unnamed = Alarm::new("", seven_thirty(), RepeatDays::once());
        assert_eq!(unnamed.display_name(), "Untitled alarm");
        assert_eq!(unnamed.notification_summary(), "Alarm");

        let named = Alarm::new("Wake up", seven_thirty(), RepeatDays::once());
        assert_eq!(named.display_name(), "Wake up");
        assert_eq!(named.notification_summary(), "Wake up");
    }

    #[test]
    fn test_notification_body() {
        let alarm = Alarm::new("Standup", NaiveTime::from_hms_opt(9, 5, 0).unwrap(), RepeatDays::once());
        assert_eq!(alarm.notification_body(), "It's 09:05:00, your alarm Standup is going off!");

        let unnamed = Alarm::new("", seven_thirty(), RepeatDays::once());
        assert_eq!(unnamed.notification_body(), "It's 07:30:00, your alarm is going off!");
    }

    #[test]
    fn test_schedule_text() {
        let alarm = Alarm::new("Gym", seven_thirty(), RepeatDays::from_days([Weekday::Mon, Weekday::Thu]));
        assert_eq!(alarm.schedule_text(), "07:30:00 every Mon, Thu");
    }

    #[test]
    fn test_parse_alarm_time() {
        assert_eq!(parse_alarm_time("07:30"), Some(seven_thirty()));
        assert_eq!(parse_alarm_time(" 07:30:00 "), Some(seven_thirty()));
        assert_eq!(parse_alarm_time("25:00"), None);
        assert_eq!(parse_alarm_time("soon"), None);
    }

    #[test]
    fn test_file_format() {
        let json = r#"{"name": "Morning Alarm", "repeat": [0, 1, 2, 3, 4], "time": "06:45:00", "enabled": false}"#;
        let alarm: Alarm = serde_json::from_str(json).unwrap();
        assert_eq!(alarm.name, "Morning Alarm");
        assert_eq!(alarm.repeat, RepeatDays::business_days());
        assert_eq!(alarm.time, NaiveTime::from_hms_opt(6, 45, 0).unwrap());
        assert!(!alarm.enabled);

        let value = serde_json::to_value(&alarm).unwrap();
        assert_eq!(value["time"], "06:45:00");
        assert_eq!(value["repeat"], serde_json::json!([0, 1, 2, 3, 4]));
        assert!(value.get("id").is_none());
    }
}
