//! Runtime configuration
//!
//! Paths and flags come from the environment and the command line. The
//! user-editable state (alarms, reminders, preferences) lives in the JSON
//! file handled by [`crate::storage`].

use crate::error::{AppError, AppResult};
use log::info;
use std::path::PathBuf;

pub const APP_NAME: &str = "alarm-clock";
pub const APP_DISPLAY_NAME: &str = "Alarm Clock";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const CONFIG_DIR_ENV: &str = "ALARMCLOCK_CONFIG_DIR";
const DEBUG_ENV: &str = "ALARMCLOCK_DEBUG";
const SOCKET_NAME: &str = "alarm-clock.sock";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `config.json` and the browser profile
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    /// Persistent Chrome profile used for the Outlook login
    pub browser_profile_dir: PathBuf,
    /// XDG autostart desktop entry
    pub autostart_file: PathBuf,
    /// Socket used to detect an already running instance
    pub instance_socket: PathBuf,
    /// Quit when the main window is closed instead of hiding to the tray
    pub debug: bool,
    /// Launched with the `hidden` argument (autostart)
    pub start_hidden: bool,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .ok_or_else(|| AppError::config("Could not determine the user data directory"))?
                .join(APP_NAME),
        };

        let autostart_file = dirs::config_dir()
            .ok_or_else(|| AppError::config("Could not determine the user config directory"))?
            .join("autostart")
            .join(format!("{}.desktop", APP_NAME));

        let instance_socket = dirs::runtime_dir()
            .unwrap_or_else(|| config_dir.clone())
            .join(SOCKET_NAME);

        let debug = std::env::var(DEBUG_ENV).map(|v| v == "1").unwrap_or(false);
        let start_hidden = std::env::args().skip(1).any(|arg| arg == "hidden");

        Ok(Self::with_dir(config_dir, autostart_file, instance_socket, debug, start_hidden))
    }

    pub fn with_dir(
        config_dir: PathBuf,
        autostart_file: PathBuf,
        instance_socket: PathBuf,
        debug: bool,
        start_hidden: bool,
    ) -> Self {
        Self {
            config_file: config_dir.join("config.json"),
            browser_profile_dir: config_dir.join("browser"),
            config_dir,
            autostart_file,
            instance_socket,
            debug,
            start_hidden,
        }
    }

    /// Makes sure the configuration directory exists and is a directory.
    pub fn validate(&self) -> AppResult<()> {
        info!("Using configuration directory {:?}", self.config_dir);
        if self.config_dir.exists() && !self.config_dir.is_dir() {
            return Err(AppError::config(format!(
                "{} exists but is not a directory",
                self.config_dir.display()
            )));
        }
        std::fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }
}
