//! UI state management module
//!
//! Holds everything the window shows that is not persisted: the current view,
//! the alarm editor draft, sync progress and notice banners.

use chrono::{NaiveTime, Weekday};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{parse_alarm_time, Alarm, RepeatDays, RepeatPreset, TIME_FORMAT};
use crate::outlook::SyncProgress;
use crate::utils::format_reminder_override;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Alarms,
    Editor,
    Preferences,
}

/// Draft of an alarm being created or edited.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// `None` while creating a new alarm
    pub editing: Option<Uuid>,
    pub enabled: bool,
    pub time: String,
    pub name: String,
    pub preset: RepeatPreset,
    pub repeat: RepeatDays,
    pub error: Option<String>,
}

impl EditorState {
    pub fn create() -> Self {
        Self {
            editing: None,
            enabled: true,
            time: NaiveTime::MIN.format(TIME_FORMAT).to_string(),
            name: String::new(),
            preset: RepeatPreset::Once,
            repeat: RepeatDays::once(),
            error: None,
        }
    }

    pub fn edit(alarm: &Alarm) -> Self {
        Self {
            editing: Some(alarm.id),
            enabled: alarm.enabled,
            time: alarm.time_text(),
            name: alarm.name.clone(),
            preset: alarm.repeat.preset(),
            repeat: alarm.repeat,
            error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.editing.is_none()
    }

    pub fn title(&self) -> &'static str {
        if self.is_new() {
            "Create new alarm"
        } else {
            "Edit alarm"
        }
    }

    pub fn save_label(&self) -> &'static str {
        if self.is_new() {
            "Add"
        } else {
            "Save"
        }
    }

    /// Picking a preset replaces the selected days; Custom keeps them.
    pub fn select_preset(&mut self, preset: RepeatPreset) {
        self.preset = preset;
        self.repeat = self.repeat.with_preset(preset);
    }

    /// Day buttons only respond while Custom is selected.
    pub fn toggle_day(&mut self, day: Weekday) {
        if self.preset == RepeatPreset::Custom {
            self.repeat.toggle(day);
        }
    }

    pub fn days_editable(&self) -> bool {
        self.preset == RepeatPreset::Custom
    }

    pub fn to_alarm(&self) -> AppResult<Alarm> {
        let time = parse_alarm_time(&self.time)
            .ok_or_else(|| AppError::invalid_input("Enter the time as HH:MM:SS"))?;

        let mut alarm = Alarm::new(self.name.trim(), time, self.repeat);
        alarm.enabled = self.enabled;
        if let Some(id) = self.editing {
            alarm.id = id;
        }
        Ok(alarm)
    }
}

/// Informational or critical message shown as a banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub critical: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            critical: false,
        }
    }

    pub fn critical(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            critical: true,
        }
    }
}

/// Progress panel of a running synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    /// `None` shows a busy bar
    pub value: Option<u8>,
    pub label: String,
}

impl SyncState {
    pub fn new() -> Self {
        Self {
            value: Some(0),
            label: "Initializing...".to_string(),
        }
    }

    pub fn apply(&mut self, progress: SyncProgress) {
        if let Some(label) = progress.label {
            self.label = label;
        }
        self.value = progress.value;
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

/// Application UI state
#[derive(Debug, Clone)]
pub struct UiState {
    pub current_view: View,
    pub editor: EditorState,
    /// Text of the reminder override field, committed on submit
    pub reminder_override: String,
    pub sync_interval: String,
    pub autostart: bool,
    /// Present while a synchronization runs
    pub sync: Option<SyncState>,
    pub notice: Option<Notice>,
    pub window_visible: bool,
}

impl UiState {
    pub fn new(forced_reminder_minutes: i32, sync_interval_minutes: u32, autostart: bool) -> Self {
        Self {
            current_view: View::Alarms,
            editor: EditorState::create(),
            reminder_override: format_reminder_override(forced_reminder_minutes),
            sync_interval: sync_interval_minutes.to_string(),
            autostart,
            sync: None,
            notice: None,
            window_visible: true,
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_editor_defaults() {
        let editor = EditorState::create();
        assert!(editor.is_new());
        assert_eq!(editor.title(), "Create new alarm");
        assert_eq!(editor.save_label(), "Add");
        assert_eq!(editor.time, "00:00:00");
        assert!(editor.repeat.is_once());
    }

    #[test]
    fn test_edit_keeps_identity_and_enabled_state() {
        let mut alarm = Alarm::new(
            "Standup",
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            RepeatDays::business_days(),
        );
        alarm.enabled = false;

        let mut editor = EditorState::edit(&alarm);
        assert_eq!(editor.title(), "Edit alarm");
        assert_eq!(editor.preset, RepeatPreset::BusinessDays);
        editor.name = "  Daily standup ".into();
        editor.time = "09:45:00".into();

        let saved = editor.to_alarm().unwrap();
        assert_eq!(saved.id, alarm.id);
        assert!(!saved.enabled);
        assert_eq!(saved.name, "Daily standup");
        assert_eq!(saved.time, NaiveTime::from_hms_opt(9, 45, 0).unwrap());
    }

    #[test]
    fn test_days_only_toggle_in_custom() {
        let mut editor = EditorState::create();
        editor.toggle_day(Weekday::Wed);
        assert!(editor.repeat.is_once());

        editor.select_preset(RepeatPreset::Custom);
        editor.toggle_day(Weekday::Wed);
        assert!(editor.repeat.contains(Weekday::Wed));

        editor.select_preset(RepeatPreset::EveryDay);
        assert_eq!(editor.repeat.len(), 7);
        assert!(!editor.days_editable());
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let mut editor = EditorState::create();
        editor.time = "25:00".into();
        assert!(matches!(editor.to_alarm(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_sync_state_keeps_label_on_value_only_update() {
        let mut state = SyncState::new();
        state.apply(SyncProgress::step(60, "Please enter your login credentials"));
        state.apply(SyncProgress::value(80));
        assert_eq!(state.value, Some(80));
        assert_eq!(state.label, "Please enter your login credentials");

        state.apply(SyncProgress::busy("Downloading reminders..."));
        assert_eq!(state.value, None);
    }
}
