// file: src/models/sync.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub imported: usize,
    /// Reminders whose reminder time had already passed
    pub skipped_past: usize,
    pub sync_time: DateTime<Utc>,
    /// Whether a browser login was needed to complete the sync
    pub logged_in: bool,
}

impl SyncResult {
    pub fn new(imported: usize, skipped_past: usize, logged_in: bool) -> Self {
        Self {
            imported,
            skipped_past,
            sync_time: Utc::now(),
            logged_in,
        }
    }

    pub fn summary(&self) -> String {
        format!("Successfully imported {} reminders from Outlook.", self.imported)
    }
}
