//! Interactive Outlook login in a visible Chrome window.
//!
//! The user signs in normally. Once the mailbox loads, the bearer token is
//! lifted from the `authorization` header of the web app's own requests.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::EventRequestWillBeSent;
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use super::{ReminderApi, SyncProgress, TokenProvider};
use crate::error::{AppError, AppResult};
use crate::utils::logging::log_auth_event;

pub const OUTLOOK_URL: &str = "https://outlook.office.com";
pub const LOGIN_URL_PREFIX: &str = "https://login.microsoftonline.com";
pub const MAILBOX_URL_PREFIX: &str = "https://outlook.office.com/mail";

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const TOKEN_WAIT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginStage {
    Loading,
    Credentials,
    Mailbox,
}

impl LoginStage {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with(MAILBOX_URL_PREFIX) {
            LoginStage::Mailbox
        } else if url.starts_with(LOGIN_URL_PREFIX) {
            LoginStage::Credentials
        } else {
            LoginStage::Loading
        }
    }
}

/// Finds a non-empty `authorization` header, whatever its casing.
pub fn extract_authorization(headers: &Value) -> Option<String> {
    headers
        .as_object()?
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .and_then(|(_, value)| value.as_str())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub struct BrowserLogin<V> {
    profile_dir: PathBuf,
    validator: V,
}

impl<V: ReminderApi> BrowserLogin<V> {
    pub fn new(profile_dir: PathBuf, validator: V) -> Self {
        Self {
            profile_dir,
            validator,
        }
    }

    async fn launch(&self) -> AppResult<(Browser, tokio::task::JoinHandle<()>)> {
        std::fs::create_dir_all(&self.profile_dir)?;
        let config = BrowserConfig::builder()
            .with_head()
            .user_data_dir(&self.profile_dir)
            .build()
            .map_err(|e| AppError::browser(format!("Missing libraries: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::browser(format!("Missing libraries: could not start Chrome ({})", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        Ok((browser, handler_task))
    }

    /// Polls the page until it reaches `target` or a later stage.
    async fn wait_for_stage(page: &Page, target: LoginStage) -> AppResult<LoginStage> {
        loop {
            let url = page.url().await.map_err(|_| AppError::LoginCancelled)?;
            let stage = url.as_deref().map(LoginStage::from_url).unwrap_or(LoginStage::Loading);
            if stage >= target {
                return Ok(stage);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn capture_token(&self, page: &Page, progress: &UnboundedSender<SyncProgress>) -> AppResult<String> {
        // Subscribe before the user signs in so no request is missed
        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|e| AppError::browser(e.to_string()))?;

        let stage = Self::wait_for_stage(page, LoginStage::Credentials).await?;
        if stage == LoginStage::Credentials {
            let _ = progress.send(SyncProgress::step(60, "Please enter your login credentials"));
            log_auth_event("Waiting for credentials");
            Self::wait_for_stage(page, LoginStage::Mailbox).await?;
        }

        let _ = progress.send(SyncProgress::step(80, "Connecting with Outlook..."));
        let _ = progress.send(SyncProgress::value(90));

        let mut tried = HashSet::new();
        let search = async {
            while let Some(event) = requests.next().await {
                let Some(token) = extract_authorization(event.request.headers.inner()) else {
                    continue;
                };
                if !tried.insert(token.clone()) {
                    continue;
                }
                match self.validator.validate_token(&token).await {
                    Ok(true) => return Ok(token),
                    Ok(false) => debug!("Captured header was not accepted"),
                    Err(e) => warn!("Token check failed: {}", e),
                }
            }
            Err(AppError::LoginCancelled)
        };

        tokio::time::timeout(TOKEN_WAIT, search)
            .await
            .map_err(|_| AppError::auth("Outlook did not send a usable token"))?
    }
}

#[async_trait]
impl<V: ReminderApi> TokenProvider for BrowserLogin<V> {
    async fn login(&self, progress: UnboundedSender<SyncProgress>) -> AppResult<String> {
        let _ = progress.send(SyncProgress::step(20, "Connecting with Outlook..."));
        let (mut browser, handler_task) = self.launch().await?;
        let _ = progress.send(SyncProgress::value(40));

        let result = match browser.new_page(OUTLOOK_URL).await {
            Ok(page) => self.capture_token(&page, &progress).await,
            Err(e) => Err(AppError::browser(e.to_string())),
        };

        if let Err(e) = browser.close().await {
            debug!("Browser already closed: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        if result.is_ok() {
            log_auth_event("Captured Outlook token");
            let _ = progress.send(SyncProgress::value(95));
        } else {
            info!("Outlook login ended without a token");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_stage_from_url() {
        assert_eq!(LoginStage::from_url("https://outlook.office.com/"), LoginStage::Loading);
        assert_eq!(
            LoginStage::from_url("https://login.microsoftonline.com/common/oauth2"),
            LoginStage::Credentials
        );
        assert_eq!(
            LoginStage::from_url("https://outlook.office.com/mail/inbox"),
            LoginStage::Mailbox
        );
        assert_eq!(LoginStage::from_url("about:blank"), LoginStage::Loading);
    }

    #[test]
    fn test_extract_authorization() {
        assert_eq!(
            extract_authorization(&json!({"Authorization": "Bearer abc", "Accept": "*/*"})),
            Some("Bearer abc".to_string())
        );
        assert_eq!(
            extract_authorization(&json!({"authorization": "MSAuth1.0 xyz"})),
            Some("MSAuth1.0 xyz".to_string())
        );
        assert_eq!(extract_authorization(&json!({"authorization": ""})), None);
        assert_eq!(extract_authorization(&json!({"accept": "*/*"})), None);
        assert_eq!(extract_authorization(&json!(["authorization"])), None);
    }
}
