// Outlook on the web integration
// Reminders come from the OWA service endpoint, authenticated with a token
// captured from an interactive browser login.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{AppError, AppResult};
use crate::models::{OutlookReminder, SyncResult};
use crate::storage::Store;
use crate::utils::logging::log_outlook_sync;

pub mod client;
pub mod login;

pub use client::OwaClient;
pub use login::BrowserLogin;

pub const SYNC_WINDOW_DAYS: i64 = 30;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderApi: Send + Sync {
    /// True when Outlook accepts the token.
    async fn validate_token(&self, token: &str) -> AppResult<bool>;

    /// Reminders between `begin` and `end`. A rejected token is `AppError::Auth`.
    async fn get_reminders(
        &self,
        token: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<OutlookReminder>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Runs an interactive login and returns a validated token.
    async fn login(&self, progress: UnboundedSender<SyncProgress>) -> AppResult<String>;
}

/// Progress of a synchronization. `value: None` means busy without a percentage,
/// `label: None` keeps the previous label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncProgress {
    pub value: Option<u8>,
    pub label: Option<String>,
}

impl SyncProgress {
    pub fn step(value: u8, label: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            label: Some(label.into()),
        }
    }

    pub fn value(value: u8) -> Self {
        Self {
            value: Some(value),
            label: None,
        }
    }

    pub fn busy(label: impl Into<String>) -> Self {
        Self {
            value: None,
            label: Some(label.into()),
        }
    }
}

async fn login_and_store(
    store: &Store,
    login: &dyn TokenProvider,
    progress: &UnboundedSender<SyncProgress>,
) -> AppResult<String> {
    store.set_outlook_token(None)?;
    let _ = progress.send(SyncProgress::step(0, "Connecting with Outlook..."));
    let token = login.login(progress.clone()).await?;
    store.set_outlook_token(Some(token.clone()))?;
    Ok(token)
}

/// A reminder stays while its effective reminder time is ahead, or while its
/// notification is still counting down to the meeting.
fn is_upcoming(
    reminder: &OutlookReminder,
    forced_lead: Option<Duration>,
    showing: bool,
    now: DateTime<Utc>,
) -> bool {
    reminder.effective_reminder_time(forced_lead) >= now || (showing && reminder.start > now)
}

/// Keeps reminders that still have something to show and saves them.
fn import(
    store: &Store,
    reminders: Vec<OutlookReminder>,
    now: DateTime<Utc>,
    logged_in: bool,
) -> AppResult<SyncResult> {
    let forced_lead = store.settings().reminder_override();
    let showing: HashSet<String> = store
        .reminders()
        .into_iter()
        .filter(|r| r.notification_id.is_some())
        .map(|r| r.id)
        .collect();

    let total = reminders.len();
    let upcoming: Vec<OutlookReminder> = reminders
        .into_iter()
        .filter(|r| is_upcoming(r, forced_lead, showing.contains(&r.id), now))
        .collect();
    let skipped = total - upcoming.len();
    let imported = store.replace_reminders(upcoming)?;
    Ok(SyncResult::new(imported, skipped, logged_in))
}

/// Downloads the next month of reminders, logging in first when needed.
/// A rejected token triggers one fresh login.
pub async fn synchronize(
    store: &Store,
    api: &dyn ReminderApi,
    login: &dyn TokenProvider,
    progress: &UnboundedSender<SyncProgress>,
) -> AppResult<SyncResult> {
    let started = std::time::Instant::now();
    let mut logged_in = false;

    let mut token = match store.outlook_token() {
        Some(token) => token,
        None => {
            logged_in = true;
            login_and_store(store, login, progress).await?
        }
    };

    let _ = progress.send(SyncProgress::busy("Downloading reminders..."));
    let now = Utc::now();
    let end = now + Duration::days(SYNC_WINDOW_DAYS);

    let reminders = match api.get_reminders(&token, now, end).await {
        Ok(reminders) => reminders,
        Err(AppError::Auth(reason)) if !logged_in => {
            warn!("Stored Outlook token no longer works: {}", reason);
            token = login_and_store(store, login, progress).await?;
            logged_in = true;
            let _ = progress.send(SyncProgress::busy("Downloading reminders..."));
            api.get_reminders(&token, now, end).await?
        }
        Err(e) => return Err(e),
    };

    let result = import(store, reminders, now, logged_in)?;
    log_outlook_sync(
        result.imported,
        result.skipped_past,
        started.elapsed().as_millis() as u64,
    );
    Ok(result)
}

/// Background variant of [`synchronize`] that only uses the stored token.
pub async fn refresh(store: &Store, api: &dyn ReminderApi) -> AppResult<SyncResult> {
    let token = store
        .outlook_token()
        .ok_or_else(|| AppError::auth("Not connected to Outlook"))?;

    let started = std::time::Instant::now();
    let now = Utc::now();
    let reminders = api
        .get_reminders(&token, now, now + Duration::days(SYNC_WINDOW_DAYS))
        .await?;

    let result = import(store, reminders, now, false)?;
    info!("Background refresh found {} reminders", result.imported);
    log_outlook_sync(
        result.imported,
        result.skipped_past,
        started.elapsed().as_millis() as u64,
    );
    Ok(result)
}
