// file: src/models/repeat.rs
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekday abbreviations, Monday first.
pub const DAY_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const BUSINESS_DAYS: u8 = 0b0001_1111;
const EVERY_DAY: u8 = 0b0111_1111;

/// The days an alarm repeats on. Bit 0 is Monday, bit 6 is Sunday.
///
/// Stored on disk as a sorted list of day indices (`[0, 1, 2, 3, 4]`). An empty
/// set means the alarm rings once and then disables itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct RepeatDays(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatPreset {
    Once,
    BusinessDays,
    EveryDay,
    Custom,
}

impl RepeatPreset {
    pub const ALL: [RepeatPreset; 4] = [
        RepeatPreset::Once,
        RepeatPreset::BusinessDays,
        RepeatPreset::EveryDay,
        RepeatPreset::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RepeatPreset::Once => "Once",
            RepeatPreset::BusinessDays => "Every business day",
            RepeatPreset::EveryDay => "Every day",
            RepeatPreset::Custom => "Custom repeat",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            RepeatPreset::Once => {
                "Set to never repeat, this means that the alarm will only be run once and then disabled"
            }
            RepeatPreset::BusinessDays => "Repeat Monday to Friday",
            RepeatPreset::EveryDay => "Repeat every day in the week",
            RepeatPreset::Custom => "Set your own days you want it to repeat to",
        }
    }
}

impl RepeatDays {
    pub fn once() -> Self {
        Self(0)
    }

    pub fn business_days() -> Self {
        Self(BUSINESS_DAYS)
    }

    pub fn every_day() -> Self {
        Self(EVERY_DAY)
    }

    pub fn from_days<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        days.into_iter().fold(Self::once(), |mut acc, day| {
            acc.insert(day);
            acc
        })
    }

    pub fn is_once(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Once alarms may ring on any day.
    pub fn fires_on(&self, day: Weekday) -> bool {
        self.is_once() || self.contains(day)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn toggle(&mut self, day: Weekday) {
        self.0 ^= Self::bit(day);
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.is_once()
    }

    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        (0..7u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .filter_map(weekday_from_index)
    }

    pub fn preset(&self) -> RepeatPreset {
        match self.0 {
            0 => RepeatPreset::Once,
            EVERY_DAY => RepeatPreset::EveryDay,
            BUSINESS_DAYS => RepeatPreset::BusinessDays,
            _ => RepeatPreset::Custom,
        }
    }

    /// Days for a preset. `Custom` keeps the current selection.
    pub fn with_preset(self, preset: RepeatPreset) -> Self {
        match preset {
            RepeatPreset::Once => Self::once(),
            RepeatPreset::BusinessDays => Self::business_days(),
            RepeatPreset::EveryDay => Self::every_day(),
            RepeatPreset::Custom => self,
        }
    }

    /// "once", "every day" or "every Mon, Wed".
    pub fn summary(&self) -> String {
        match self.len() {
            0 => "once".to_string(),
            7 => "every day".to_string(),
            _ => {
                let names: Vec<&str> = self
                    .days()
                    .map(|d| DAY_ABBREVIATIONS[d.num_days_from_monday() as usize])
                    .collect();
                format!("every {}", names.join(", "))
            }
        }
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

impl From<Vec<u8>> for RepeatDays {
    fn from(days: Vec<u8>) -> Self {
        // Out-of-range indices are ignored rather than rejected
        RepeatDays::from_days(days.into_iter().filter_map(weekday_from_index))
    }
}

impl From<RepeatDays> for Vec<u8> {
    fn from(days: RepeatDays) -> Self {
        days.days().map(|d| d.num_days_from_monday() as u8).collect()
    }
}
