use crate::models::{MAX_FORCED_REMINDER_MINUTES, USE_OUTLOOK_REMINDER};

pub mod logging;

pub const DEFAULT_LABEL: &str = "Default";

/// Text shown in the reminder override field.
pub fn format_reminder_override(minutes: i32) -> String {
    if minutes < 0 {
        DEFAULT_LABEL.to_string()
    } else {
        minutes.to_string()
    }
}

/// Parses the reminder override field. Empty input or "Default" means -1.
pub fn parse_reminder_override(input: &str) -> Option<i32> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case(DEFAULT_LABEL) {
        return Some(USE_OUTLOOK_REMINDER);
    }
    input
        .parse::<i32>()
        .ok()
        .filter(|m| (USE_OUTLOOK_REMINDER..=MAX_FORCED_REMINDER_MINUTES).contains(m))
}

pub fn reminder_count_label(count: usize) -> String {
    match count {
        1 => "1 reminder".to_string(),
        n => format!("{} reminders", n),
    }
}
