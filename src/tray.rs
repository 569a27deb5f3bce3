//! System tray icon.
//!
//! On Linux the icon lives on its own GTK thread. The UI talks to it through
//! [`TrayHandle`] and hears about menu clicks as [`UiEvent::Tray`].

use log::{info, warn};
use std::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{AppError, AppResult};
use crate::UiEvent;

pub const MENU_OPEN: &str = "open";
pub const MENU_SYNC: &str = "sync";
pub const MENU_COUNT: &str = "count";
pub const MENU_QUIT: &str = "quit";

const ICON_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    Open,
    Synchronize,
    Quit,
}

impl TrayEvent {
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            MENU_OPEN => Some(TrayEvent::Open),
            MENU_SYNC => Some(TrayEvent::Synchronize),
            MENU_QUIT => Some(TrayEvent::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayCommand {
    SetTooltip(String),
    SetReminderCount(usize),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct TrayHandle {
    commands: mpsc::Sender<TrayCommand>,
}

impl TrayHandle {
    pub fn set_tooltip(&self, tooltip: impl Into<String>) {
        let _ = self.commands.send(TrayCommand::SetTooltip(tooltip.into()));
    }

    pub fn set_reminder_count(&self, count: usize) {
        let _ = self.commands.send(TrayCommand::SetReminderCount(count));
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(TrayCommand::Shutdown);
    }
}

/// A clock face: white dial, dark rim, hands at ten past ten.
pub fn alarm_icon_rgba(size: u32) -> Vec<u8> {
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;
    let rim = (size as f32 / 10.0).max(1.5);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius {
                continue;
            }

            let on_rim = distance > radius - rim;
            // Hour hand towards 10 o'clock, minute hand towards 2 o'clock
            let on_hand = |angle: f32, length: f32| {
                let (sin, cos) = angle.to_radians().sin_cos();
                let along = dx * sin - dy * cos;
                let across = (dx * cos + dy * sin).abs();
                along >= 0.0 && along <= length && across <= rim / 2.0 + 0.5
            };
            let dark = on_rim || on_hand(-60.0, radius * 0.5) || on_hand(60.0, radius * 0.75);

            let i = ((y * size + x) * 4) as usize;
            let shade = if dark { 40 } else { 250 };
            rgba[i..i + 4].copy_from_slice(&[shade, shade, shade, 255]);
        }
    }
    rgba
}

#[cfg(target_os = "linux")]
pub fn spawn(ui_tx: UnboundedSender<UiEvent>, tooltip: String, reminder_count: usize) -> AppResult<TrayHandle> {
    let (commands_tx, commands_rx) = mpsc::channel();
    let (ready_tx, ready_rx) = mpsc::channel();

    std::thread::Builder::new()
        .name("tray".to_string())
        .spawn(move || linux::run(commands_rx, ui_tx, tooltip, reminder_count, ready_tx))?;

    match ready_rx.recv() {
        Ok(Ok(())) => {
            info!("Tray icon ready");
            Ok(TrayHandle {
                commands: commands_tx,
            })
        }
        Ok(Err(e)) => Err(AppError::tray(e)),
        Err(_) => Err(AppError::tray("Tray thread exited during setup")),
    }
}

#[cfg(not(target_os = "linux"))]
pub fn spawn(_ui_tx: UnboundedSender<UiEvent>, _tooltip: String, _reminder_count: usize) -> AppResult<TrayHandle> {
    warn!("The tray icon is only available on Linux");
    Err(AppError::tray("Tray icon is not supported on this platform"))
}

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use crate::utils::reminder_count_label;
    use gtk::glib::{self, ControlFlow};
    use std::time::Duration;
    use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};
    use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    fn build(tooltip: &str, open: &MenuItem, sync: &MenuItem, count: &MenuItem, quit: &MenuItem) -> Result<TrayIcon, String> {
        let outlook = Submenu::with_items("Outlook", true, &[sync, count]).map_err(|e| e.to_string())?;
        let menu = Menu::new();
        menu.append_items(&[open, &outlook, &PredefinedMenuItem::separator(), quit])
            .map_err(|e| e.to_string())?;

        let icon = Icon::from_rgba(alarm_icon_rgba(ICON_SIZE), ICON_SIZE, ICON_SIZE).map_err(|e| e.to_string())?;

        TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .with_tooltip(tooltip)
            .build()
            .map_err(|e| e.to_string())
    }

    pub(super) fn run(
        commands: mpsc::Receiver<TrayCommand>,
        ui_tx: UnboundedSender<UiEvent>,
        tooltip: String,
        reminder_count: usize,
        ready: mpsc::Sender<Result<(), String>>,
    ) {
        if let Err(e) = gtk::init() {
            let _ = ready.send(Err(format!("GTK could not be initialised: {}", e)));
            return;
        }

        let open = MenuItem::with_id(MENU_OPEN, "&Open", true, None);
        let sync = MenuItem::with_id(MENU_SYNC, "Synchronize...", true, None);
        let count = MenuItem::with_id(MENU_COUNT, reminder_count_label(reminder_count), false, None);
        let quit = MenuItem::with_id(MENU_QUIT, "&Quit", true, None);

        let tray = match build(&tooltip, &open, &sync, &count, &quit) {
            Ok(tray) => tray,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        glib::timeout_add_local(POLL_INTERVAL, move || {
            while let Ok(event) = MenuEvent::receiver().try_recv() {
                if let Some(tray_event) = TrayEvent::from_menu_id(event.id.0.as_str()) {
                    let _ = ui_tx.send(UiEvent::Tray(tray_event));
                }
            }

            loop {
                match commands.try_recv() {
                    Ok(TrayCommand::SetTooltip(text)) => {
                        if let Err(e) = tray.set_tooltip(Some(text)) {
                            warn!("Failed to update tray tooltip: {}", e);
                        }
                    }
                    Ok(TrayCommand::SetReminderCount(n)) => count.set_text(reminder_count_label(n)),
                    Ok(TrayCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                        gtk::main_quit();
                        return ControlFlow::Break;
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                }
            }
            ControlFlow::Continue
        });

        gtk::main();
        info!("Tray thread stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_ids() {
        assert_eq!(TrayEvent::from_menu_id("open"), Some(TrayEvent::Open));
        assert_eq!(TrayEvent::from_menu_id("sync"), Some(TrayEvent::Synchronize));
        assert_eq!(TrayEvent::from_menu_id("quit"), Some(TrayEvent::Quit));
        assert_eq!(TrayEvent::from_menu_id("count"), None);
    }

    #[test]
    fn test_icon_pixels() {
        let rgba = alarm_icon_rgba(ICON_SIZE);
        assert_eq!(rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        // Corners are transparent, the rim is opaque
        assert_eq!(rgba[3], 0);
        let mid_top = ((1 * ICON_SIZE + ICON_SIZE / 2) * 4) as usize;
        assert_eq!(rgba[mid_top + 3], 255);
        assert_eq!(rgba[mid_top], 40);
    }

    #[test]
    fn test_handle_sends_commands() {
        let (tx, rx) = mpsc::channel();
        let handle = TrayHandle { commands: tx };
        handle.set_tooltip("Next alarm: Tea at 16:00:00");
        handle.set_reminder_count(2);
        handle.shutdown();
        assert_eq!(rx.recv().unwrap(), TrayCommand::SetTooltip("Next alarm: Tea at 16:00:00".into()));
        assert_eq!(rx.recv().unwrap(), TrayCommand::SetReminderCount(2));
        assert_eq!(rx.recv().unwrap(), TrayCommand::Shutdown);
    }
}
