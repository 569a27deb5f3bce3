//! Command handlers module
//!
//! Async operations the UI runs through `Command::perform`. Each handler group
//! is cheap to clone so it can move into the spawned future.

use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use uuid::Uuid;

use crate::autostart;
use crate::error::{AppError, AppResult};
use crate::models::{Alarm, Settings, SyncResult, MAX_FORCED_REMINDER_MINUTES, USE_OUTLOOK_REMINDER};
use crate::outlook::{self, ReminderApi, TokenProvider};
use crate::storage::Store;
use crate::UiEvent;

/// Alarm list operations
#[derive(Clone)]
pub struct AlarmHandlers {
    pub store: Store,
}

impl AlarmHandlers {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Adds the alarm or replaces the one with the same id.
    pub async fn save_alarm(&self, alarm: Alarm) -> AppResult<Alarm> {
        info!("Saving alarm '{}' at {}", alarm.display_name(), alarm.time_text());
        self.store.upsert_alarm(alarm.clone())?;
        Ok(alarm)
    }

    pub async fn delete_alarm(&self, id: Uuid) -> AppResult<Uuid> {
        if !self.store.remove_alarm(id)? {
            return Err(AppError::not_found(format!("Alarm {}", id)));
        }
        info!("Deleted alarm {}", id);
        Ok(id)
    }

    pub async fn set_enabled(&self, id: Uuid, enabled: bool) -> AppResult<()> {
        if !self.store.set_alarm_enabled(id, enabled)? {
            return Err(AppError::not_found(format!("Alarm {}", id)));
        }
        Ok(())
    }
}

/// Preferences window operations
#[derive(Clone)]
pub struct PreferenceHandlers {
    pub store: Store,
    pub autostart_file: PathBuf,
    pub executable: PathBuf,
}

impl PreferenceHandlers {
    pub fn new(store: Store, autostart_file: PathBuf, executable: PathBuf) -> Self {
        Self {
            store,
            autostart_file,
            executable,
        }
    }

    pub fn autostart_enabled(&self) -> bool {
        autostart::is_enabled(&self.autostart_file)
    }

    pub async fn set_autostart(&self, enabled: bool) -> AppResult<bool> {
        autostart::set_enabled(&self.autostart_file, &self.executable, enabled)?;
        Ok(enabled)
    }

    pub async fn set_reminder_override(&self, minutes: i32) -> AppResult<Settings> {
        if !(USE_OUTLOOK_REMINDER..=MAX_FORCED_REMINDER_MINUTES).contains(&minutes) {
            return Err(AppError::invalid_input(format!(
                "Reminder override must be between {} and {} minutes",
                USE_OUTLOOK_REMINDER, MAX_FORCED_REMINDER_MINUTES
            )));
        }
        let settings = Settings {
            forced_outlook_reminder_minutes: minutes,
            ..self.store.settings()
        };
        self.store.update_settings(settings.clone())?;
        info!("Outlook reminder override set to {}", minutes);
        Ok(settings)
    }

    pub async fn set_sync_interval(&self, minutes: u32) -> AppResult<Settings> {
        let settings = Settings {
            outlook_sync_interval_minutes: minutes,
            ..self.store.settings()
        };
        self.store.update_settings(settings.clone())?;
        info!("Background refresh interval set to {} minutes", minutes);
        Ok(settings)
    }
}

/// Outlook operations
#[derive(Clone)]
pub struct OutlookHandlers {
    pub store: Store,
    pub api: Arc<dyn ReminderApi>,
    pub login: Arc<dyn TokenProvider>,
}

impl OutlookHandlers {
    pub fn new(store: Store, api: Arc<dyn ReminderApi>, login: Arc<dyn TokenProvider>) -> Self {
        Self { store, api, login }
    }

    /// Runs a full synchronization, streaming progress to the UI.
    pub async fn synchronize(&self, ui_tx: UnboundedSender<UiEvent>) -> AppResult<SyncResult> {
        let (progress_tx, mut progress_rx) = unbounded_channel();
        let forward = tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                if ui_tx.send(UiEvent::SyncProgress(progress)).is_err() {
                    break;
                }
            }
        });

        let result = outlook::synchronize(
            &self.store,
            self.api.as_ref(),
            self.login.as_ref(),
            &progress_tx,
        )
        .await;
        drop(progress_tx);
        let _ = forward.await;

        match &result {
            Ok(sync) => info!("Outlook synchronization finished: {}", sync.summary()),
            Err(AppError::LoginCancelled) => info!("Outlook login was cancelled"),
            Err(e) => error!("Outlook synchronization failed: {}", e.to_safe_string()),
        }
        result
    }
}

/// Command handler factory
#[derive(Clone)]
pub struct CommandHandlers {
    pub alarms: AlarmHandlers,
    pub preferences: PreferenceHandlers,
    pub outlook: OutlookHandlers,
}

impl CommandHandlers {
    pub fn new(
        store: &Store,
        autostart_file: PathBuf,
        executable: PathBuf,
        api: Arc<dyn ReminderApi>,
        login: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            alarms: AlarmHandlers::new(store.clone()),
            preferences: PreferenceHandlers::new(store.clone(), autostart_file, executable),
            outlook: OutlookHandlers::new(store.clone(), api, login),
        }
    }
}
