// Alarm Clock Library
// Exposes core functionality for testing and reuse

pub mod alerts;
pub mod autostart;
pub mod command_handlers;
pub mod config;
pub mod error;
pub mod http_config;
pub mod instance;
pub mod messages;
pub mod models;
pub mod notifications;
pub mod outlook;
pub mod storage;
pub mod tray;
pub mod ui;
pub mod ui_state;
pub mod utils;

// Re-export commonly used types
pub use alerts::{monitor_alarms, process_tick, MonitorEvent, Ticker};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use models::*;
pub use notifications::{DesktopNotifier, Notify};
pub use outlook::{ReminderApi, SyncProgress, TokenProvider};
pub use storage::Store;

use std::sync::Arc;

/// Application state shared with the background monitor
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub notifier: Arc<dyn Notify>,
    pub outlook: Arc<dyn ReminderApi>,
    pub shutdown: tokio_util::sync::CancellationToken,
}

/// Events from outside the iced runtime: the tray, a second launch, and
/// progress of a running Outlook sync.
#[derive(Debug, Clone)]
pub enum UiEvent {
    ShowWindow,
    Tray(tray::TrayEvent),
    SyncProgress(SyncProgress),
}
