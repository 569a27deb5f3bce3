use chrono::Weekday;
use uuid::Uuid;

use crate::alerts::MonitorEvent;
use crate::models::{Alarm, RepeatPreset, Settings, SyncResult};
use crate::UiEvent;

/// Unified application message type
///
/// Messages are organized by domain for better maintainability.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation Messages =====
    /// Back to the alarm list
    ShowAlarms,
    /// Open the editor for a new alarm
    AddAlarm,
    /// Open the editor for an existing alarm
    EditAlarm(Uuid),
    ShowPreferences,
    DismissNotice,

    // ===== Editor Messages =====
    EditorTimeChanged(String),
    EditorNameChanged(String),
    EditorPresetSelected(RepeatPreset),
    EditorDayToggled(Weekday),
    SaveEditor,

    // ===== Alarm List Messages =====
    ToggleAlarm(Uuid, bool),
    DeleteAlarm(Uuid),

    // ===== Preferences Messages =====
    AutostartToggled(bool),
    ReminderOverrideChanged(String),
    ReminderOverrideSubmitted,
    SyncIntervalChanged(String),
    SyncIntervalSubmitted,

    // ===== Outlook Messages =====
    /// Start a synchronization, logging in when needed
    Synchronize,

    // ===== Async Operation Results =====
    AlarmSaved(Result<Alarm, String>),
    AlarmDeleted(Result<Uuid, String>),
    AlarmToggled(Result<(), String>),
    AutostartUpdated(Result<bool, String>),
    SettingsUpdated(Result<Settings, String>),
    SyncFinished(Result<SyncResult, String>),
    SyncCancelled,

    // ===== Window & Tray Messages =====
    /// Tray, second instance or sync progress
    UiEvent(UiEvent),
    WindowCloseRequested,
    /// Periodic refresh of the tray tooltip and alarm list
    Tick,
    Quit,

    // ===== Monitor System Messages =====
    /// Background monitor event received
    MonitorEventReceived(MonitorEvent),
}
