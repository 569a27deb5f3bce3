// file: src/storage/mod.rs

//! Flat JSON file holding alarms, imported reminders, the Outlook token and
//! preferences. Every change rewrites the whole file.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::{Alarm, OutlookReminder, Settings};

pub mod alarms;
pub mod reminders;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub alarms: Vec<Alarm>,
    #[serde(default)]
    pub outlook_reminders: Vec<OutlookReminder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlook_token: Option<String>,
    #[serde(flatten)]
    pub settings: Settings,
}

#[derive(Clone)]
pub struct Store {
    path: PathBuf,
    doc: Arc<RwLock<ConfigDocument>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut doc = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if content.trim().is_empty() {
                ConfigDocument::default()
            } else {
                serde_json::from_str(&content).context("Failed to parse configuration file")?
            }
        } else {
            info!("No configuration at {:?}, starting empty", path);
            ConfigDocument::default()
        };

        doc.settings = doc.settings.validated();
        doc.outlook_token = doc.outlook_token.filter(|t| !t.trim().is_empty());
        info!(
            "Loaded {} alarms and {} Outlook reminders",
            doc.alarms.len(),
            doc.outlook_reminders.len()
        );

        Ok(Self {
            path,
            doc: Arc::new(RwLock::new(doc)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("Failed to create configuration directory")?;
        }

        let content = {
            let doc = self.read();
            serde_json::to_string_pretty(&*doc).context("Failed to serialize configuration")?
        };

        fs::write(&self.path, content).context("Failed to write configuration file")?;
        debug!("Saved configuration to {:?}", self.path);
        Ok(())
    }

    // --- Alarms ---

    /// All alarms, ordered by time of day.
    pub fn alarms(&self) -> Vec<Alarm> {
        alarms::sorted(&self.read().alarms)
    }

    pub fn alarm(&self, id: Uuid) -> Option<Alarm> {
        self.read().alarms.iter().find(|a| a.id == id).cloned()
    }

    pub fn upsert_alarm(&self, alarm: Alarm) -> Result<()> {
        self.update(|doc| alarms::upsert(&mut doc.alarms, alarm))
    }

    pub fn remove_alarm(&self, id: Uuid) -> Result<bool> {
        self.update(|doc| alarms::remove(&mut doc.alarms, id))
    }

    pub fn set_alarm_enabled(&self, id: Uuid, enabled: bool) -> Result<bool> {
        self.update(|doc| alarms::set_enabled(&mut doc.alarms, id, enabled))
    }

    /// Turns off a once alarm after it rang.
    pub fn disable_alarm(&self, id: Uuid) -> Result<bool> {
        self.set_alarm_enabled(id, false)
    }

    pub fn next_alarm(&self, now: NaiveDateTime) -> Option<Alarm> {
        alarms::next_due(&self.read().alarms, now).cloned()
    }

    pub fn tooltip(&self, now: NaiveDateTime) -> String {
        alarms::tooltip(self.next_alarm(now).as_ref())
    }

    // --- Outlook reminders ---

    pub fn reminders(&self) -> Vec<OutlookReminder> {
        self.read().outlook_reminders.clone()
    }

    pub fn reminder_count(&self) -> usize {
        self.read().outlook_reminders.len()
    }

    pub fn replace_reminders(&self, new: Vec<OutlookReminder>) -> Result<usize> {
        self.update(|doc| reminders::replace(&mut doc.outlook_reminders, new))
    }

    /// Runtime-only bookkeeping, the file is not rewritten.
    pub fn set_reminder_notification(&self, id: &str, notification_id: Option<u32>) -> bool {
        reminders::set_notification(&mut self.write().outlook_reminders, id, notification_id)
    }

    // --- Settings and token ---

    pub fn settings(&self) -> Settings {
        self.read().settings.clone()
    }

    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        self.update(|doc| doc.settings = settings.validated())
    }

    pub fn outlook_token(&self) -> Option<String> {
        self.read().outlook_token.clone()
    }

    pub fn set_outlook_token(&self, token: Option<String>) -> Result<()> {
        self.update(|doc| doc.outlook_token = token)
    }

    fn update<T>(&self, f: impl FnOnce(&mut ConfigDocument) -> T) -> Result<T> {
        let out = {
            let mut doc = self.write();
            f(&mut doc)
        };
        self.save()?;
        Ok(out)
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigDocument> {
        self.doc.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigDocument> {
        self.doc.write().unwrap_or_else(PoisonError::into_inner)
    }
}
