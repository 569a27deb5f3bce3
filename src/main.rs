// Alarm Clock - alarm clock in the system tray with Outlook reminders
// Main entry point for iced application

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use iced::futures::SinkExt; // Import SinkExt for sender.send()
use iced::widget::{column, container};
use iced::{window, Application, Command, Element, Length, Settings as IcedSettings, Subscription, Theme};
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use alarm_clock::command_handlers::CommandHandlers;
use alarm_clock::config::{APP_DISPLAY_NAME, APP_NAME, APP_VERSION};
use alarm_clock::http_config::HttpConfig;
use alarm_clock::instance::{self, Instance};
use alarm_clock::messages::Message;
use alarm_clock::models::{Alarm, Settings};
use alarm_clock::outlook::{BrowserLogin, OwaClient};
use alarm_clock::tray::{self, TrayEvent, TrayHandle};
use alarm_clock::ui::styles::{panel, Panel};
use alarm_clock::ui_state::{EditorState, Notice, SyncState, UiState, View};
use alarm_clock::utils::logging::{init_logging, log_error_with_context};
use alarm_clock::utils::{format_reminder_override, parse_reminder_override};
use alarm_clock::{monitor_alarms, ui, AppConfig, AppError, AppState, DesktopNotifier, MonitorEvent, Store, UiEvent};

// Helper function to convert technical errors to user-friendly messages
fn user_friendly_error(error: &str) -> String {
    if error.contains("Missing libraries") {
        "Chrome or Chromium is needed to connect with Outlook. Please install it and try again.".to_string()
    } else if error.contains("Outlook rejected") || error.contains("usable token") {
        "Outlook did not accept the login. Please synchronize again.".to_string()
    } else if error.contains("Network") || error.contains("connection") {
        "Network error. Please check your internet connection and try again.".to_string()
    } else if error.contains("timed out") || error.contains("timeout") {
        "Request timed out. Please try again in a moment.".to_string()
    } else if let Some(reason) = error.strip_prefix("Invalid input: ") {
        reason.to_string()
    } else {
        // Fallback: clean up technical error message
        error
            .replace("Failed to", "Could not")
            .replace("Error:", "")
            .trim()
            .to_string()
    }
}

pub struct Flags {
    config: AppConfig,
    state: AppState,
    handlers: CommandHandlers,
    tray: Option<TrayHandle>,
    ui_tx: UnboundedSender<UiEvent>,
    ui_rx: UnboundedReceiver<UiEvent>,
}

pub struct AlarmClockApp {
    config: AppConfig,
    state: Arc<AppState>,

    // Command handlers for async operations
    handlers: CommandHandlers,

    // UI state management
    ui_state: UiState,

    // Tray and the channel it shares with the instance listener
    tray: Option<TrayHandle>,
    tooltip: String,
    ui_tx: UnboundedSender<UiEvent>,
    ui_rx: Arc<Mutex<Option<UnboundedReceiver<UiEvent>>>>,

    // Data
    alarms: Vec<Alarm>,
    reminder_count: usize,
}

impl AlarmClockApp {
    fn store(&self) -> &Store {
        &self.state.store
    }

    fn reload(&mut self) {
        self.alarms = self.store().alarms();
        self.reminder_count = self.store().reminder_count();
        self.refresh_tooltip();
    }

    fn refresh_tooltip(&mut self) {
        let tooltip = self.store().tooltip(Local::now().naive_local());
        if tooltip != self.tooltip {
            debug!("Tray tooltip: {}", tooltip);
            if let Some(tray) = &self.tray {
                tray.set_tooltip(tooltip.clone());
            }
            self.tooltip = tooltip;
        }
    }

    fn set_reminder_count(&mut self, count: usize) {
        self.reminder_count = count;
        if let Some(tray) = &self.tray {
            tray.set_reminder_count(count);
        }
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.ui_state.reminder_override = format_reminder_override(settings.forced_outlook_reminder_minutes);
        self.ui_state.sync_interval = settings.outlook_sync_interval_minutes.to_string();
    }

    fn show_window(&mut self) -> Command<Message> {
        self.ui_state.window_visible = true;
        Command::batch(vec![
            window::change_mode(window::Id::MAIN, window::Mode::Windowed),
            window::gain_focus(window::Id::MAIN),
        ])
    }

    fn hide_window(&mut self) -> Command<Message> {
        self.ui_state.window_visible = false;
        window::change_mode(window::Id::MAIN, window::Mode::Hidden)
    }

    fn critical(&mut self, title: &str, error: &str) {
        error!("{}: {}", title, error);
        self.ui_state.notice = Some(Notice::critical(title, user_friendly_error(error)));
    }
}

impl Application for AlarmClockApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = Flags;

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        let settings = flags.state.store.settings();
        let autostart = flags.handlers.preferences.autostart_enabled();
        let mut ui_state = UiState::new(
            settings.forced_outlook_reminder_minutes,
            settings.outlook_sync_interval_minutes,
            autostart,
        );
        ui_state.window_visible = !flags.config.start_hidden;

        let mut app = AlarmClockApp {
            config: flags.config,
            state: Arc::new(flags.state),
            handlers: flags.handlers,
            ui_state,
            tray: flags.tray,
            tooltip: APP_DISPLAY_NAME.to_string(),
            ui_tx: flags.ui_tx,
            ui_rx: Arc::new(Mutex::new(Some(flags.ui_rx))),
            alarms: Vec::new(),
            reminder_count: 0,
        };
        app.reload();
        info!(
            "Loaded {} alarms and {} Outlook reminders",
            app.alarms.len(),
            app.reminder_count
        );

        (app, Command::none())
    }

    fn title(&self) -> String {
        match self.ui_state.current_view {
            View::Alarms => APP_DISPLAY_NAME.to_string(),
            View::Editor => self.ui_state.editor.title().to_string(),
            View::Preferences => "Preferences".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ShowAlarms => {
                self.ui_state.current_view = View::Alarms;
                Command::none()
            }
            Message::AddAlarm => {
                self.ui_state.editor = EditorState::create();
                self.ui_state.current_view = View::Editor;
                Command::none()
            }
            Message::EditAlarm(id) => {
                match self.store().alarm(id) {
                    Some(alarm) => {
                        self.ui_state.editor = EditorState::edit(&alarm);
                        self.ui_state.current_view = View::Editor;
                    }
                    None => warn!("Alarm {} no longer exists", id),
                }
                Command::none()
            }
            Message::ShowPreferences => {
                self.ui_state.autostart = self.handlers.preferences.autostart_enabled();
                let settings = self.store().settings();
                self.apply_settings(&settings);
                self.ui_state.current_view = View::Preferences;
                Command::none()
            }
            Message::DismissNotice => {
                self.ui_state.notice = None;
                Command::none()
            }

            Message::EditorTimeChanged(time) => {
                self.ui_state.editor.time = time;
                self.ui_state.editor.error = None;
                Command::none()
            }
            Message::EditorNameChanged(name) => {
                self.ui_state.editor.name = name;
                Command::none()
            }
            Message::EditorPresetSelected(preset) => {
                self.ui_state.editor.select_preset(preset);
                Command::none()
            }
            Message::EditorDayToggled(day) => {
                self.ui_state.editor.toggle_day(day);
                Command::none()
            }
            Message::SaveEditor => match self.ui_state.editor.to_alarm() {
                Ok(alarm) => {
                    let handlers = self.handlers.alarms.clone();
                    Command::perform(
                        async move { handlers.save_alarm(alarm).await },
                        |result| Message::AlarmSaved(result.map_err(|e| e.to_string())),
                    )
                }
                Err(e) => {
                    self.ui_state.editor.error = Some(user_friendly_error(&e.to_string()));
                    Command::none()
                }
            },

            Message::ToggleAlarm(id, enabled) => {
                if let Some(alarm) = self.alarms.iter_mut().find(|a| a.id == id) {
                    alarm.enabled = enabled;
                }
                let handlers = self.handlers.alarms.clone();
                Command::perform(
                    async move { handlers.set_enabled(id, enabled).await },
                    |result| Message::AlarmToggled(result.map_err(|e| e.to_string())),
                )
            }
            Message::DeleteAlarm(id) => {
                let handlers = self.handlers.alarms.clone();
                Command::perform(
                    async move { handlers.delete_alarm(id).await },
                    |result| Message::AlarmDeleted(result.map_err(|e| e.to_string())),
                )
            }

            Message::AutostartToggled(enabled) => {
                let handlers = self.handlers.preferences.clone();
                Command::perform(
                    async move { handlers.set_autostart(enabled).await },
                    |result| Message::AutostartUpdated(result.map_err(|e| e.to_string())),
                )
            }
            Message::ReminderOverrideChanged(value) => {
                self.ui_state.reminder_override = value;
                Command::none()
            }
            Message::ReminderOverrideSubmitted => {
                match parse_reminder_override(&self.ui_state.reminder_override) {
                    Some(minutes) => {
                        let handlers = self.handlers.preferences.clone();
                        Command::perform(
                            async move { handlers.set_reminder_override(minutes).await },
                            |result| Message::SettingsUpdated(result.map_err(|e| e.to_string())),
                        )
                    }
                    None => {
                        self.ui_state.notice = Some(Notice::critical(
                            "Preferences",
                            "Enter a number of minutes between -1 and 10000, or Default.",
                        ));
                        Command::none()
                    }
                }
            }
            Message::SyncIntervalChanged(value) => {
                self.ui_state.sync_interval = value;
                Command::none()
            }
            Message::SyncIntervalSubmitted => match self.ui_state.sync_interval.trim().parse::<u32>() {
                Ok(minutes) => {
                    let handlers = self.handlers.preferences.clone();
                    Command::perform(
                        async move { handlers.set_sync_interval(minutes).await },
                        |result| Message::SettingsUpdated(result.map_err(|e| e.to_string())),
                    )
                }
                Err(_) => {
                    self.ui_state.notice = Some(Notice::critical(
                        "Preferences",
                        "Enter the refresh interval in whole minutes, or 0 to turn it off.",
                    ));
                    Command::none()
                }
            },

            Message::Synchronize => {
                let show = self.show_window();
                if self.ui_state.is_syncing() {
                    return show;
                }
                self.ui_state.sync = Some(SyncState::new());
                self.ui_state.notice = None;

                let handlers = self.handlers.outlook.clone();
                let ui_tx = self.ui_tx.clone();
                let sync = Command::perform(
                    async move { handlers.synchronize(ui_tx).await },
                    |result| match result {
                        Ok(result) => Message::SyncFinished(Ok(result)),
                        Err(AppError::LoginCancelled) => Message::SyncCancelled,
                        Err(e) => Message::SyncFinished(Err(e.to_string())),
                    },
                );
                Command::batch(vec![show, sync])
            }

            Message::AlarmSaved(Ok(alarm)) => {
                info!("Alarm '{}' saved", alarm.display_name());
                self.ui_state.current_view = View::Alarms;
                self.reload();
                Command::none()
            }
            Message::AlarmSaved(Err(error)) => {
                self.critical("Could not save alarm", &error);
                Command::none()
            }
            Message::AlarmDeleted(result) => {
                if let Err(error) = result {
                    self.critical("Could not delete alarm", &error);
                }
                self.reload();
                Command::none()
            }
            Message::AlarmToggled(result) => {
                if let Err(error) = result {
                    self.critical("Could not update alarm", &error);
                }
                self.reload();
                Command::none()
            }
            Message::AutostartUpdated(Ok(enabled)) => {
                self.ui_state.autostart = enabled;
                Command::none()
            }
            Message::AutostartUpdated(Err(error)) => {
                self.critical("Autostart", &error);
                self.ui_state.autostart = self.handlers.preferences.autostart_enabled();
                Command::none()
            }
            Message::SettingsUpdated(Ok(settings)) => {
                self.apply_settings(&settings);
                Command::none()
            }
            Message::SettingsUpdated(Err(error)) => {
                self.critical("Preferences", &error);
                Command::none()
            }
            Message::SyncFinished(Ok(result)) => {
                self.ui_state.sync = None;
                self.set_reminder_count(self.store().reminder_count());
                self.ui_state.notice = Some(Notice::info("Outlook Reminders", result.summary()));
                Command::none()
            }
            Message::SyncFinished(Err(error)) => {
                self.ui_state.sync = None;
                self.critical("Outlook", &error);
                Command::none()
            }
            Message::SyncCancelled => {
                self.ui_state.sync = None;
                self.ui_state.notice = Some(Notice::info(
                    "Cancelled",
                    "Login has been cancelled. Not synchronizing.",
                ));
                Command::none()
            }

            Message::UiEvent(event) => match event {
                UiEvent::ShowWindow | UiEvent::Tray(TrayEvent::Open) => self.show_window(),
                UiEvent::Tray(TrayEvent::Synchronize) => self.update(Message::Synchronize),
                UiEvent::Tray(TrayEvent::Quit) => self.update(Message::Quit),
                UiEvent::SyncProgress(progress) => {
                    if let Some(sync) = self.ui_state.sync.as_mut() {
                        sync.apply(progress);
                    }
                    Command::none()
                }
            },
            Message::WindowCloseRequested => {
                if self.config.debug {
                    self.update(Message::Quit)
                } else {
                    self.hide_window()
                }
            }
            Message::Tick => {
                self.refresh_tooltip();
                Command::none()
            }
            Message::Quit => {
                info!("Quitting");
                self.state.shutdown.cancel();
                self.state.notifier.close_all();
                if let Some(tray) = &self.tray {
                    tray.shutdown();
                }
                window::close(window::Id::MAIN)
            }

            Message::MonitorEventReceived(event) => {
                match event {
                    MonitorEvent::AlarmFired(alarm) => {
                        info!("Alarm '{}' fired", alarm.display_name());
                        self.reload();
                    }
                    MonitorEvent::ReminderNotified { id, subject } => {
                        debug!("Reminder {} ({}) notified", id, subject);
                    }
                    MonitorEvent::RemindersRefreshed(count) => self.set_reminder_count(count),
                    MonitorEvent::Error(e) => warn!("Monitor reported: {}", e),
                }
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        struct MonitorLoop;
        struct UiEvents;

        let state = self.state.clone();
        let monitor = iced::subscription::channel(
            std::any::TypeId::of::<MonitorLoop>(),
            100,
            move |mut output| async move {
                let (sender, mut receiver) = tokio::sync::mpsc::channel(100);

                tokio::spawn(async move {
                    monitor_alarms(state, Some(sender)).await;
                });

                // Forward monitor events to subscription output
                loop {
                    match receiver.recv().await {
                        Some(event) => {
                            let _ = output.send(Message::MonitorEventReceived(event)).await;
                        }
                        None => std::future::pending::<()>().await,
                    }
                }
            },
        );

        let ui_rx = self.ui_rx.clone();
        let ui_events = iced::subscription::channel(
            std::any::TypeId::of::<UiEvents>(),
            100,
            move |mut output| async move {
                let mut receiver = ui_rx.lock().await.take();
                loop {
                    let event = match receiver.as_mut() {
                        Some(receiver) => receiver.recv().await,
                        None => None,
                    };
                    match event {
                        Some(event) => {
                            let _ = output.send(Message::UiEvent(event)).await;
                        }
                        None => std::future::pending::<()>().await,
                    }
                }
            },
        );

        let close_requests = iced::event::listen_with(|event, _status| match event {
            iced::Event::Window(_, window::Event::CloseRequested) => Some(Message::WindowCloseRequested),
            _ => None,
        });

        let tick = iced::time::every(std::time::Duration::from_secs(1)).map(|_| Message::Tick);

        Subscription::batch(vec![monitor, ui_events, close_requests, tick])
    }

    fn view(&self) -> Element<'_, Message> {
        let toolbar = ui::toolbar(
            self.ui_state.current_view,
            self.reminder_count,
            self.ui_state.is_syncing(),
        );

        let content: Element<Message> = match self.ui_state.current_view {
            View::Alarms => ui::alarm_list(&self.alarms),
            View::Editor => container(ui::editor::view(&self.ui_state.editor))
                .width(Length::Fill)
                .center_x()
                .padding(24)
                .into(),
            View::Preferences => container(ui::preferences::view(&self.ui_state))
                .width(Length::Fill)
                .center_x()
                .padding(24)
                .into(),
        };

        let mut page = column![toolbar].spacing(12);
        if let Some(sync) = &self.ui_state.sync {
            page = page.push(container(ui::sync_panel(sync)).padding([0, 16]));
        }
        if let Some(notice) = &self.ui_state.notice {
            page = page.push(container(ui::notice_banner(notice)).padding([0, 16]));
        }
        page = page.push(content);

        container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(panel(Panel::Background))
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

#[tokio::main]
async fn main() -> iced::Result {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting {} {}", APP_DISPLAY_NAME, APP_VERSION);

    let config = match AppConfig::from_env().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let listener = match instance::acquire(&config.instance_socket).await {
        Ok(Instance::Primary(listener)) => listener,
        Ok(Instance::Secondary) => {
            info!("{} is already running, showing its window", APP_DISPLAY_NAME);
            std::process::exit(0);
        }
        Err(e) => {
            error!("Failed to claim the instance socket: {}", e);
            std::process::exit(1);
        }
    };

    let store = match Store::open(&config.config_file) {
        Ok(store) => store,
        Err(e) => {
            log_error_with_context(&e, "loading configuration");
            eprintln!("Failed to load {}: {}", config.config_file.display(), e);
            std::process::exit(1);
        }
    };

    let clients = OwaClient::new(&HttpConfig::outlook_api())
        .and_then(|api| Ok((api, OwaClient::new(&HttpConfig::token_check())?)));
    let (api, validator) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let api = Arc::new(api);
    let login = Arc::new(BrowserLogin::new(config.browser_profile_dir.clone(), validator));

    let state = AppState {
        store: store.clone(),
        notifier: Arc::new(DesktopNotifier::new()),
        outlook: api.clone(),
        shutdown: CancellationToken::new(),
    };

    let (ui_tx, ui_rx) = unbounded_channel();
    tokio::spawn(listener.serve(ui_tx.clone(), state.shutdown.clone()));

    let tray = match tray::spawn(
        ui_tx.clone(),
        store.tooltip(Local::now().naive_local()),
        store.reminder_count(),
    ) {
        Ok(tray) => Some(tray),
        Err(e) => {
            warn!("Failed to create tray icon: {}", e);
            warn!("Continuing without tray icon - closing the window will quit");
            None
        }
    };

    let executable = std::env::current_exe().unwrap_or_else(|_| PathBuf::from(APP_NAME));
    let handlers = CommandHandlers::new(&store, config.autostart_file.clone(), executable, api, login);

    let mut config = config;
    if tray.is_none() {
        // Nothing to bring the window back from
        config.debug = true;
        config.start_hidden = false;
    }
    let visible = !config.start_hidden;

    // Run iced application
    AlarmClockApp::run(IcedSettings {
        flags: Flags {
            config,
            state,
            handlers,
            tray,
            ui_tx,
            ui_rx,
        },
        window: window::Settings {
            size: iced::Size::new(800.0, 500.0),
            resizable: true,
            visible,
            exit_on_close_request: false,
            ..Default::default()
        },
        id: None,
        fonts: vec![],
        default_font: Default::default(),
        default_text_size: iced::Pixels(16.0),
        antialiasing: false,
    })
}
