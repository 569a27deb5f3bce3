//! Desktop notifications through the freedesktop notification server.

use log::{info, warn};
use notify_rust::{Notification, Timeout, Urgency};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::APP_DISPLAY_NAME;
use crate::error::{AppError, AppResult};
use crate::models::NotificationRequest;
use crate::utils::logging::log_notification_event;

pub const NOTIFICATION_ICON: &str = "alarm-symbolic";

/// Seam between the tick loop and the notification server.
#[cfg_attr(test, mockall::automock)]
pub trait Notify: Send + Sync {
    /// Shows (or replaces) a notification and returns its id.
    fn show(&self, request: &NotificationRequest) -> AppResult<u32>;
    fn close(&self, id: u32);
    /// False once the user dismissed it.
    fn is_open(&self, id: u32) -> bool;
    fn close_all(&self);
}

type OpenNotifications = Arc<Mutex<HashMap<u32, NotificationRequest>>>;

/// Notifications on screen, keyed by id, with the request last shown under each.
#[derive(Clone, Default)]
pub struct DesktopNotifier {
    open: OpenNotifications,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn build(request: &NotificationRequest) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(APP_DISPLAY_NAME)
            .summary(&request.summary)
            .body(&request.body)
            .icon(NOTIFICATION_ICON);

        if request.urgency_critical {
            notification.urgency(Urgency::Critical);
        }
        if request.never_expire {
            notification.timeout(Timeout::Never);
        }
        if let Some(sound) = &request.sound {
            notification.sound_name(sound);
        }
        if let Some(id) = request.replaces_id {
            notification.id(id);
        }
        notification
    }

    fn open_ids(&self) -> std::sync::MutexGuard<'_, HashMap<u32, NotificationRequest>> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Any signal from the server ends the watch: a click on the body usually
/// closes the popup without a separate close signal.
fn on_action(open: &OpenNotifications, id: u32, action: &str) {
    open.lock().unwrap_or_else(PoisonError::into_inner).remove(&id);
    let event = if action == "__closed" { "closed" } else { "activated" };
    log_notification_event(event, id, action);
}

/// Same content again under the same id, silent, so closing it does not
/// visibly change the popup first.
fn closing_request(shown: &NotificationRequest, id: u32) -> NotificationRequest {
    NotificationRequest {
        replaces_id: Some(id),
        sound: None,
        ..shown.clone()
    }
}

impl Notify for DesktopNotifier {
    fn show(&self, request: &NotificationRequest) -> AppResult<u32> {
        let handle = Self::build(request)
            .show()
            .map_err(|e| AppError::notification(e.to_string()))?;
        let id = handle.id();
        log_notification_event("shown", id, &request.summary);

        // A replaced notification already has a watcher
        if self.open_ids().insert(id, request.clone()).is_some() {
            return Ok(id);
        }

        let open = Arc::clone(&self.open);
        std::thread::Builder::new()
            .name(format!("notification-{}", id))
            .spawn(move || {
                handle.wait_for_action(|action| on_action(&open, id, action));
            })
            .map_err(|e| AppError::notification(format!("Failed to watch notification: {}", e)))?;

        Ok(id)
    }

    fn close(&self, id: u32) {
        let Some(shown) = self.open_ids().remove(&id) else {
            return;
        };
        // Closing needs a handle, which only comes from showing
        match Self::build(&closing_request(&shown, id)).show() {
            Ok(handle) => handle.close(),
            Err(e) => warn!("Failed to close notification {}: {}", id, e),
        }
    }

    fn is_open(&self, id: u32) -> bool {
        self.open_ids().contains_key(&id)
    }

    fn close_all(&self) {
        let ids: Vec<u32> = self.open_ids().keys().copied().collect();
        if !ids.is_empty() {
            info!("Closing {} open notifications", ids.len());
        }
        for id in ids {
            self.close(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ALARM_SOUND;

    fn request(summary: &str) -> NotificationRequest {
        NotificationRequest {
            replaces_id: None,
            summary: summary.into(),
            body: "In 5 minutes\nat 10:00:00 - 10:30:00".into(),
            urgency_critical: true,
            never_expire: true,
            sound: Some(ALARM_SOUND.into()),
        }
    }

    #[test]
    fn test_tracking_without_a_server() {
        let notifier = DesktopNotifier::new();
        notifier.open_ids().insert(7, request("Standup"));
        assert!(notifier.is_open(7));
        assert!(!notifier.is_open(8));
    }

    #[test]
    fn test_any_action_ends_tracking() {
        let notifier = DesktopNotifier::new();
        notifier.open_ids().insert(4, request("Clicked"));
        notifier.open_ids().insert(5, request("Closed"));

        on_action(&notifier.open, 4, "default");
        on_action(&notifier.open, 5, "__closed");
        assert!(!notifier.is_open(4));
        assert!(!notifier.is_open(5));
    }

    #[test]
    fn test_closing_request_keeps_content_silently() {
        let shown = request("Standup");
        let closing = closing_request(&shown, 12);
        assert_eq!(closing.replaces_id, Some(12));
        assert_eq!(closing.summary, shown.summary);
        assert_eq!(closing.body, shown.body);
        assert!(closing.sound.is_none());
    }

    #[test]
    fn test_close_unknown_id_is_a_no_op() {
        let notifier = DesktopNotifier::new();
        notifier.close(99);
        notifier.close_all();
        assert!(!notifier.is_open(99));
    }

    #[test]
    fn test_mock_notify_returns_ids() {
        let mut mock = MockNotify::new();
        mock.expect_show()
            .withf(|r| r.sound.as_deref() == Some(ALARM_SOUND))
            .times(1)
            .returning(|_| Ok(3));
        mock.expect_is_open().returning(|id| id == 3);

        let request = NotificationRequest {
            replaces_id: None,
            summary: "Alarm".into(),
            body: "It's 07:00:00, your alarm is going off!".into(),
            urgency_critical: true,
            never_expire: true,
            sound: Some(ALARM_SOUND.into()),
        };
        assert_eq!(mock.show(&request).unwrap(), 3);
        assert!(mock.is_open(3));
    }
}
